//! Runtime value representation
//!
//! - Booleans and numbers: immediate values
//! - Strings: reference-counted, immutable
//! - Functions: user closures (parameters, body, captured environment) or built-in primitives

use crate::ast::{Literal, Node};
use crate::environment::Environment;
use crate::stdlib::Builtin;
use std::fmt;
use std::rc::Rc;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Function(Function),
}

/// Callable value
#[derive(Clone)]
pub enum Function {
    /// Produced by the `fun` special form
    Closure(Rc<Closure>),
    /// One of the bootstrap primitives
    Builtin(&'static Builtin),
}

/// User-defined function with its defining environment
pub struct Closure {
    /// Parameter names, bound positionally on each call
    pub params: Vec<String>,
    pub body: Node,
    /// Environment active where `fun` was evaluated
    pub env: Environment,
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    /// Everything except the boolean `false` is truthy; `0` and `""` included
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::String(s) => Value::string(s),
            Literal::Number(n) => Value::Number(*n),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl Function {
    /// Declared parameter count
    pub fn arity(&self) -> usize {
        match self {
            Function::Closure(closure) => closure.params.len(),
            Function::Builtin(builtin) => builtin.arity,
        }
    }

    /// Identity comparison: two function values are equal only if they are the same object
    pub fn ptr_eq(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Closure(a), Function::Closure(b)) => Rc::ptr_eq(a, b),
            (Function::Builtin(a), Function::Builtin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    /// Equality contract:
    /// - Bool, Number, String: content equality (NaN is unequal to itself)
    /// - Function: identity
    /// - Different variants are never equal; there is no coercion
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "{}", func),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Closure(closure) => write!(f, "<fun({})>", closure.params.join(", ")),
            Function::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Function(func) => write!(f, "Function({:?})", func),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Closure(closure) => write!(f, "{:?}", closure),
            Function::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish()
    }
}

/// Shortest round-trip decimal form; magnitudes from 1e21 up or below 1e-6 switch to
/// exponent notation (`1e+300`, `1.5e-7`), and non-finite values use their usual names
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{:e}", n);
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        };
    }
    n.to_string()
}
