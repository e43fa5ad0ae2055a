//! REPL core logic (UI-agnostic)

use crate::ast::Node;
use crate::diagnostic::Diagnostic;
use crate::interpreter::{Interpreter, Output, DEFAULT_MAX_CALL_DEPTH};
use crate::parser::parse_program;
use crate::stdlib;
use crate::value::{Function, Value};

/// REPL result type
pub struct ReplResult {
    /// The value produced by evaluation (None on error)
    pub value: Option<Value>,
    /// Diagnostics from parsing or evaluation
    pub diagnostics: Vec<Diagnostic>,
    /// Output written by `print` during this line; empty when the core streams
    pub stdout: String,
}

/// A user-visible global binding
#[derive(Debug, Clone, PartialEq)]
pub struct ReplBinding {
    pub name: String,
    pub type_name: &'static str,
    pub value: Value,
}

/// REPL core state
///
/// Maintains one global environment across lines:
/// - Definitions persist
/// - Errors do not reset state
///
/// `print` streams to standard output unless another [`Output`] is given.
pub struct ReplCore {
    interpreter: Interpreter,
    max_call_depth: usize,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Self::with_output(Output::Stdout, max_call_depth)
    }

    /// Create a REPL core whose `print` goes to `output`
    pub fn with_output(output: Output, max_call_depth: usize) -> Self {
        Self {
            interpreter: fresh_interpreter(output, max_call_depth),
            max_call_depth,
        }
    }

    /// Evaluate a line of input
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        let outcome = parse_program(input).and_then(|program| self.interpreter.eval(&program));
        let stdout = self.interpreter.output_mut().take_captured();

        match outcome {
            Ok(value) => ReplResult {
                value: Some(value),
                diagnostics: Vec::new(),
                stdout,
            },
            Err(e) => ReplResult {
                value: None,
                diagnostics: vec![Diagnostic::from_error(&e, input).with_file("<repl>")],
                stdout,
            },
        }
    }

    /// Parse a line without evaluating it
    pub fn parse_line(&self, input: &str) -> Result<Node, Diagnostic> {
        parse_program(input).map_err(|e| Diagnostic::from_error(&e, input).with_file("<repl>"))
    }

    /// Global bindings introduced by the user, sorted by name
    pub fn variables(&self) -> Vec<ReplBinding> {
        self.interpreter
            .global()
            .local_bindings()
            .into_iter()
            .filter(|(name, value)| !is_bootstrap_binding(name, value))
            .map(|(name, value)| ReplBinding {
                name,
                type_name: value.type_name(),
                value,
            })
            .collect()
    }

    /// Reset REPL state
    ///
    /// Discards every definition and restores the bootstrap environment
    pub fn reset(&mut self) {
        let output = std::mem::take(&mut self.interpreter.output);
        self.interpreter = fresh_interpreter(output, self.max_call_depth);
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}

fn fresh_interpreter(output: Output, max_call_depth: usize) -> Interpreter {
    Interpreter::with_output(output).with_max_call_depth(max_call_depth)
}

/// A bootstrap name still bound to its original value; redefinitions are shown
fn is_bootstrap_binding(name: &str, value: &Value) -> bool {
    match name {
        "true" => *value == Value::Bool(true),
        "false" => *value == Value::Bool(false),
        _ => match (stdlib::lookup(name), value) {
            (Some(builtin), Value::Function(Function::Builtin(bound))) => std::ptr::eq(*bound, builtin),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    fn capturing_repl() -> ReplCore {
        ReplCore::with_output(Output::captured(), DEFAULT_MAX_CALL_DEPTH)
    }

    /// Shared sink that refuses writes once `capacity` bytes are stored
    #[derive(Clone)]
    struct LimitedSink {
        bytes: Rc<RefCell<Vec<u8>>>,
        capacity: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut bytes = self.bytes.borrow_mut();
            if bytes.len() + buf.len() > self.capacity {
                return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
            }
            bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_repl_eval() {
        let mut repl = ReplCore::new();
        let result = repl.eval_line("+(1, 1)");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.value, Some(Value::Number(2.0)));
    }

    #[test]
    fn test_state_persists_across_lines() {
        let mut repl = ReplCore::new();
        repl.eval_line("define(square, fun(n, *(n, n)))");
        let result = repl.eval_line("square(9)");
        assert_eq!(result.value, Some(Value::Number(81.0)));
    }

    #[test]
    fn test_errors_keep_state() {
        let mut repl = ReplCore::new();
        repl.eval_line("define(x, 1)");
        let failed = repl.eval_line("y");
        assert!(failed.value.is_none());
        assert_eq!(failed.diagnostics[0].kind, Some(ErrorKind::ReferenceError));
        assert_eq!(failed.diagnostics[0].file, "<repl>");
        assert_eq!(repl.eval_line("x").value, Some(Value::Number(1.0)));
    }

    #[test]
    fn test_print_is_captured_per_line() {
        let mut repl = capturing_repl();
        let result = repl.eval_line(r#"do(print("a"), print("b"))"#);
        assert_eq!(result.stdout, "a\nb\n");
        assert_eq!(repl.eval_line("1").stdout, "");
    }

    #[test]
    fn test_print_streams_before_line_finishes() {
        let sink = LimitedSink {
            bytes: Rc::new(RefCell::new(Vec::new())),
            capacity: 6,
        };
        let mut repl = ReplCore::with_output(Output::writer(sink.clone()), DEFAULT_MAX_CALL_DEPTH);

        // The loop never ends on its own; only the sink refusing a write stops it
        let result = repl.eval_line("while(true, print(1))");
        assert!(result.value.is_none());
        assert_eq!(result.diagnostics[0].kind, Some(ErrorKind::IoError));
        assert_eq!(result.stdout, "");
        assert_eq!(sink.bytes.borrow().as_slice(), b"1\n1\n1\n");
    }

    #[test]
    fn test_reset_keeps_output() {
        let mut repl = capturing_repl();
        repl.eval_line("define(x, 1)");
        repl.reset();
        assert_eq!(repl.eval_line(r#"print("after")"#).stdout, "after\n");
    }

    #[test]
    fn test_variables_exclude_bootstrap() {
        let mut repl = ReplCore::new();
        assert!(repl.variables().is_empty());

        repl.eval_line("define(b, \"text\")");
        repl.eval_line("define(a, 1)");
        let names: Vec<String> = repl.variables().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(repl.variables()[1].type_name, "string");
    }

    #[test]
    fn test_redefined_bootstrap_names_are_listed() {
        let mut repl = ReplCore::new();
        repl.eval_line("define(print, 5)");
        let names: Vec<String> = repl.variables().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["print"]);
    }

    #[test]
    fn test_reset() {
        let mut repl = ReplCore::new();
        repl.eval_line("define(x, 1)");
        repl.reset();
        assert!(repl.variables().is_empty());
        assert!(repl.eval_line("x").value.is_none());
    }

    #[test]
    fn test_parse_line() {
        let repl = ReplCore::new();
        assert_eq!(repl.parse_line("f(x)(y)").unwrap().to_string(), "f(x)(y)");
        assert!(repl.parse_line("f(").is_err());
    }
}
