//! Global bootstrap: boolean constants and the built-in primitives
//!
//! The primitive set is closed: seven binary operators and `print`.

use crate::diagnostic::error_codes;
use crate::environment::Environment;
use crate::error::{EggResult, Error};
use crate::interpreter::Output;
use crate::span::Span;
use crate::value::{Function, Value};

/// Signature shared by every primitive. `args` always has exactly `arity` elements.
pub type BuiltinFn = fn(args: &[Value], out: &mut Output, span: Span) -> EggResult<Value>;

/// A built-in primitive function
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
}

/// Every primitive installed into the global environment
pub static BUILTINS: [Builtin; 8] = [
    Builtin { name: "+", arity: 2, func: add },
    Builtin { name: "-", arity: 2, func: sub },
    Builtin { name: "*", arity: 2, func: mul },
    Builtin { name: "/", arity: 2, func: div },
    Builtin { name: "==", arity: 2, func: equal },
    Builtin { name: "<", arity: 2, func: less },
    Builtin { name: ">", arity: 2, func: greater },
    Builtin { name: "print", arity: 1, func: print },
];

/// Names bound in a fresh global environment
pub fn global_names() -> impl Iterator<Item = &'static str> {
    ["true", "false"]
        .into_iter()
        .chain(BUILTINS.iter().map(|builtin| builtin.name))
}

/// Check if a name is one of the bootstrap bindings
pub fn is_builtin(name: &str) -> bool {
    global_names().any(|global| global == name)
}

/// Find a primitive by name
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Populate `env` with `true`, `false` and every primitive
pub fn install_globals(env: &Environment) {
    env.define("true", Value::Bool(true));
    env.define("false", Value::Bool(false));
    for builtin in BUILTINS.iter() {
        env.define(builtin.name, Value::Function(Function::Builtin(builtin)));
    }
}

fn operand_error(op: &str, args: &[Value], expected: &str, span: Span) -> Error {
    Error::type_error(
        error_codes::OPERAND_TYPE,
        format!(
            "'{}' expects {}, got {} and {}",
            op,
            expected,
            args[0].type_name(),
            args[1].type_name()
        ),
        span,
    )
}

fn numbers(op: &str, args: &[Value], span: Span) -> EggResult<(f64, f64)> {
    match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(operand_error(op, args, "two numbers", span)),
    }
}

/// Adds two numbers or concatenates two strings
fn add(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
        _ => Err(operand_error("+", args, "two numbers or two strings", span)),
    }
}

fn sub(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    let (a, b) = numbers("-", args, span)?;
    Ok(Value::Number(a - b))
}

fn mul(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    let (a, b) = numbers("*", args, span)?;
    Ok(Value::Number(a * b))
}

/// IEEE division: dividing by zero yields an infinity or NaN rather than an error
fn div(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    let (a, b) = numbers("/", args, span)?;
    Ok(Value::Number(a / b))
}

fn equal(args: &[Value], _out: &mut Output, _span: Span) -> EggResult<Value> {
    Ok(Value::Bool(args[0] == args[1]))
}

fn less(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
        (Value::String(a), Value::String(b)) => Ok(Value::Bool(a < b)),
        _ => Err(operand_error("<", args, "two numbers or two strings", span)),
    }
}

fn greater(args: &[Value], _out: &mut Output, span: Span) -> EggResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
        (Value::String(a), Value::String(b)) => Ok(Value::Bool(a > b)),
        _ => Err(operand_error(">", args, "two numbers or two strings", span)),
    }
}

/// Writes the argument on its own line and hands it back unchanged
fn print(args: &[Value], out: &mut Output, span: Span) -> EggResult<Value> {
    let value = &args[0];
    out.write_line(&value.to_string()).map_err(|e| Error::Io {
        message: format!("failed to write output: {}", e),
        span,
    })?;
    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn call(name: &str, args: &[Value]) -> EggResult<Value> {
        let builtin = lookup(name).unwrap();
        let mut out = Output::captured();
        (builtin.func)(args, &mut out, Span::dummy())
    }

    #[rstest]
    #[case("+", 7.0, 2.0, Value::Number(9.0))]
    #[case("-", 7.0, 2.0, Value::Number(5.0))]
    #[case("*", 7.0, 2.0, Value::Number(14.0))]
    #[case("/", 7.0, 2.0, Value::Number(3.5))]
    #[case("==", 7.0, 7.0, Value::Bool(true))]
    #[case("==", 7.0, 2.0, Value::Bool(false))]
    #[case("<", 2.0, 7.0, Value::Bool(true))]
    #[case("<", 7.0, 7.0, Value::Bool(false))]
    #[case(">", 7.0, 2.0, Value::Bool(true))]
    fn test_numeric_operators(#[case] op: &str, #[case] a: f64, #[case] b: f64, #[case] expected: Value) {
        assert_eq!(call(op, &[Value::Number(a), Value::Number(b)]).unwrap(), expected);
    }

    #[test]
    fn test_divide_by_zero_is_infinite() {
        let result = call("/", &[Value::Number(1.0), Value::Number(0.0)]).unwrap();
        assert_eq!(result, Value::Number(f64::INFINITY));
    }

    #[test]
    fn test_string_concatenation_and_ordering() {
        assert_eq!(
            call("+", &[Value::string("egg"), Value::string("nog")]).unwrap(),
            Value::string("eggnog")
        );
        assert_eq!(
            call("<", &[Value::string("abc"), Value::string("abd")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_equality_has_no_coercion() {
        assert_eq!(
            call("==", &[Value::Number(1.0), Value::string("1")]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            call("==", &[Value::string("a"), Value::string("a")]).unwrap(),
            Value::Bool(true)
        );
    }

    #[rstest]
    #[case("+", Value::Number(1.0), Value::string("1"))]
    #[case("-", Value::string("a"), Value::string("b"))]
    #[case("*", Value::Bool(true), Value::Number(2.0))]
    #[case("<", Value::Number(1.0), Value::string("2"))]
    fn test_operand_type_errors(#[case] op: &str, #[case] a: Value, #[case] b: Value) {
        let err = call(op, &[a, b]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert_eq!(err.code(), error_codes::OPERAND_TYPE);
    }

    #[test]
    fn test_print_returns_argument_and_writes_line() {
        let builtin = lookup("print").unwrap();
        let mut out = Output::captured();
        let result = (builtin.func)(&[Value::Number(55.0)], &mut out, Span::dummy()).unwrap();
        assert_eq!(result, Value::Number(55.0));
        assert_eq!(out.take_captured(), "55\n");
    }

    #[test]
    fn test_install_globals() {
        let env = Environment::new();
        install_globals(&env);
        assert_eq!(env.get("true"), Some(Value::Bool(true)));
        assert_eq!(env.get("false"), Some(Value::Bool(false)));
        for name in ["+", "-", "*", "/", "==", "<", ">", "print"] {
            assert!(matches!(env.get(name), Some(Value::Function(_))), "missing {}", name);
        }
        assert_eq!(global_names().count(), 10);
        assert!(is_builtin("print"));
        assert!(!is_builtin("if"));
    }
}
