//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation against a chain of lexical environments.
//! - Literals evaluate to themselves
//! - Words are looked up through the environment chain
//! - Applications either dispatch to a special form (arguments unevaluated) or evaluate the
//!   operator and arguments left to right and call the resulting function

mod special_forms;

pub use special_forms::{is_special_form, SPECIAL_FORMS};

use crate::ast::Node;
use crate::diagnostic::error_codes;
use crate::environment::Environment;
use crate::error::{EggResult, Error};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;
use crate::stdlib;
use crate::value::{Function, Value};
use std::fmt;
use std::io::{self, Write};

pub use egg_config::{DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_LIMIT};

/// Where `print` writes
///
/// `Stdout` and `Writer` see each line as soon as `print` runs; `Captured` holds it
/// until drained.
#[derive(Default)]
pub enum Output {
    /// The process's standard output
    #[default]
    Stdout,
    /// In-memory buffer, drained with [`Output::take_captured`]
    Captured(Vec<u8>),
    /// Host-provided sink, flushed after every line
    Writer(Box<dyn Write>),
}

impl Output {
    pub fn captured() -> Self {
        Output::Captured(Vec::new())
    }

    pub fn writer(sink: impl Write + 'static) -> Self {
        Output::Writer(Box::new(sink))
    }

    /// Write `text` followed by a newline
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", text)?;
                stdout.flush()
            }
            Output::Captured(buffer) => writeln!(buffer, "{}", text),
            Output::Writer(sink) => {
                writeln!(sink, "{}", text)?;
                sink.flush()
            }
        }
    }

    /// Drain captured output; always empty for `Stdout` and `Writer`
    pub fn take_captured(&mut self) -> String {
        match self {
            Output::Stdout | Output::Writer(_) => String::new(),
            Output::Captured(buffer) => String::from_utf8_lossy(&std::mem::take(buffer)).into_owned(),
        }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("Stdout"),
            Output::Captured(buffer) => write!(f, "Captured({} bytes)", buffer.len()),
            Output::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// Interpreter state
pub struct Interpreter {
    /// Top-level environment holding the bootstrap bindings and top-level definitions
    global: Environment,
    pub(crate) output: Output,
    max_call_depth: usize,
    /// Current number of active function calls
    call_depth: usize,
}

impl Interpreter {
    /// Create a new interpreter that prints to standard output
    pub fn new() -> Self {
        Self::with_output(Output::Stdout)
    }

    pub fn with_output(output: Output) -> Self {
        let global = Environment::new();
        stdlib::install_globals(&global);
        Self {
            global,
            output,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
        }
    }

    /// Limit nested function calls, clamped to `1..=MAX_CALL_DEPTH_LIMIT`
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth.clamp(1, MAX_CALL_DEPTH_LIMIT);
        self
    }

    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// The top-level environment
    pub fn global(&self) -> &Environment {
        &self.global
    }

    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    /// Evaluate a program in the global environment
    pub fn eval(&mut self, program: &Node) -> EggResult<Value> {
        tracing::debug!(program = %program, "evaluating program");
        let global = self.global.clone();
        // An error may unwind from inside nested calls
        self.call_depth = 0;
        self.evaluate(program, &global)
    }

    /// Evaluate `node` against `env`
    pub fn evaluate(&mut self, node: &Node, env: &Environment) -> EggResult<Value> {
        ensure_sufficient_stack(|| self.evaluate_node(node, env))
    }

    fn evaluate_node(&mut self, node: &Node, env: &Environment) -> EggResult<Value> {
        match node {
            Node::Value { raw, .. } => Ok(Value::from(raw)),
            Node::Word { name, span } => env
                .get(name)
                .ok_or_else(|| Error::undefined(name.as_str(), *span)),
            Node::Apply {
                operator,
                args,
                span,
            } => {
                if let Some(form) = operator.as_word().and_then(special_forms::lookup) {
                    return form(self, args, env, *span);
                }

                let func = match self.evaluate(operator, env)? {
                    Value::Function(func) => func,
                    other => {
                        return Err(Error::type_error(
                            error_codes::NOT_CALLABLE,
                            format!(
                                "applying a non-function: {} is a {}",
                                operator,
                                other.type_name()
                            ),
                            *span,
                        ))
                    }
                };

                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg, env)?);
                }

                self.call_function(&func, values, *span)
            }
        }
    }

    /// Invoke a function value with already-evaluated arguments
    pub fn call_function(&mut self, func: &Function, args: Vec<Value>, span: Span) -> EggResult<Value> {
        if args.len() != func.arity() {
            return Err(Error::type_error(
                error_codes::ARITY_MISMATCH,
                format!(
                    "wrong number of arguments to {}: expected {}, got {}",
                    func,
                    func.arity(),
                    args.len()
                ),
                span,
            ));
        }

        tracing::trace!(function = %func, argc = args.len(), "apply");

        match func {
            Function::Builtin(builtin) => (builtin.func)(&args, &mut self.output, span),
            Function::Closure(closure) => {
                if self.call_depth >= self.max_call_depth {
                    return Err(Error::RecursionLimit {
                        limit: self.max_call_depth,
                        span,
                    });
                }

                // One fresh scope per call, parented on the defining environment
                let local = Environment::with_parent(&closure.env);
                for (param, value) in closure.params.iter().zip(args) {
                    local.define(param.as_str(), value);
                }

                self.call_depth += 1;
                let result = self.evaluate(&closure.body, &local);
                self.call_depth -= 1;
                result
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
