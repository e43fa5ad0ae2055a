//! Egg runtime API for embedding

use crate::ast::Node;
use crate::diagnostic::Diagnostic;
use crate::interpreter::{Interpreter, Output, DEFAULT_MAX_CALL_DEPTH};
use crate::parser::parse_program;
use crate::span::Span;
use crate::value::Value;
use std::cell::RefCell;
use std::path::Path;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Diagnostic>;

/// Settings for a runtime instance
#[derive(Debug)]
pub struct RuntimeOptions {
    /// Maximum nesting of function calls before evaluation fails
    pub max_call_depth: usize,
    /// Destination of `print`
    pub output: Output,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            output: Output::Stdout,
        }
    }
}

/// Egg runtime instance
///
/// Provides a high-level API for embedding Egg in host applications. Top-level definitions
/// persist across calls on the same instance.
///
/// # Examples
///
/// ```
/// use egg_runtime::{Egg, Value};
///
/// let runtime = Egg::new();
/// let result = runtime.eval("+(1, 2)");
/// assert_eq!(result.unwrap(), Value::Number(3.0));
/// ```
pub struct Egg {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
}

impl Egg {
    /// Create a new runtime that prints to standard output
    pub fn new() -> Self {
        Self::with_options(RuntimeOptions::default())
    }

    /// Create a runtime with explicit options
    ///
    /// # Examples
    ///
    /// ```
    /// use egg_runtime::{Egg, Output, RuntimeOptions};
    ///
    /// let runtime = Egg::with_options(RuntimeOptions {
    ///     output: Output::captured(),
    ///     ..RuntimeOptions::default()
    /// });
    /// runtime.eval(r#"print("hello")"#).unwrap();
    /// assert_eq!(runtime.take_output(), "hello\n");
    /// ```
    pub fn with_options(options: RuntimeOptions) -> Self {
        let interpreter =
            Interpreter::with_output(options.output).with_max_call_depth(options.max_call_depth);
        Self {
            interpreter: RefCell::new(interpreter),
        }
    }

    /// Parse source code without evaluating it
    pub fn parse(&self, source: &str) -> RuntimeResult<Node> {
        parse_program(source).map_err(|e| Diagnostic::from_error(&e, source))
    }

    /// Evaluate Egg source code
    ///
    /// Returns the value of the program's single top-level expression, or a diagnostic
    /// describing the first error.
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        let program = self.parse(source)?;
        let mut interpreter = self.interpreter.borrow_mut();
        interpreter
            .eval(&program)
            .map_err(|e| Diagnostic::from_error(&e, source))
    }

    /// Evaluate a program given as separate lines, joined with newlines
    ///
    /// ```
    /// use egg_runtime::{Egg, Value};
    ///
    /// let runtime = Egg::new();
    /// let result = runtime.run_lines(&["do(define(x, 4),", "   *(x, x))"]);
    /// assert_eq!(result.unwrap(), Value::Number(16.0));
    /// ```
    pub fn run_lines(&self, lines: &[&str]) -> RuntimeResult<Value> {
        self.eval(&lines.join("\n"))
    }

    /// Evaluate an Egg source file
    ///
    /// Diagnostics are tagged with the file path.
    pub fn eval_file(&self, path: impl AsRef<Path>) -> RuntimeResult<Value> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(format!("Failed to read file: {}", e), Span::dummy())
                .with_file(path.display().to_string())
        })?;

        self.eval(&source)
            .map_err(|diag| diag.with_file(path.display().to_string()))
    }

    /// Drain output captured by `print` (empty when printing to stdout)
    pub fn take_output(&self) -> String {
        self.interpreter.borrow_mut().output_mut().take_captured()
    }

    /// Look up a top-level binding
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.interpreter.borrow().global().get(name)
    }
}

impl Default for Egg {
    fn default() -> Self {
        Self::new()
    }
}
