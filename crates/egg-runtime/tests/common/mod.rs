//! Shared test utilities
//!
//! Helpers that evaluate Egg source on a runtime whose `print` output is captured, so tests
//! can assert on values, diagnostics and printed lines without touching stdout.

#![allow(dead_code)]

use egg_runtime::{Diagnostic, Egg, Output, RuntimeOptions, Value};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Runtime that captures everything written by `print`
pub fn runtime() -> Egg {
    Egg::with_options(RuntimeOptions {
        output: Output::captured(),
        ..RuntimeOptions::default()
    })
}

/// Evaluate source and return its value and printed output
pub fn eval_with_output(source: &str) -> (Result<Value, Diagnostic>, String) {
    let egg = runtime();
    let result = egg.eval(source);
    (result, egg.take_output())
}

/// Assert that source code evaluates to a number
///
/// # Example
/// ```
/// assert_eval_number("+(1, 2)", 3.0);
/// ```
pub fn assert_eval_number(source: &str, expected: f64) {
    match runtime().eval(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "Expected {}, got {}", expected, n),
        other => panic!("Expected Number({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    match runtime().eval(source) {
        Ok(Value::String(s)) => assert_eq!(s.as_ref(), expected),
        other => panic!("Expected String({:?}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    match runtime().eval(source) {
        Ok(Value::Bool(b)) => assert_eq!(b, expected, "Expected {}, got {}", expected, b),
        other => panic!("Expected Bool({}), got {:?}", expected, other),
    }
}

/// Assert that source code produces an error with a specific code
///
/// # Example
/// ```
/// assert_error_code("nope", "EG0200");
/// ```
pub fn assert_error_code(source: &str, expected_code: &str) {
    match runtime().eval(source) {
        Err(diag) => assert_eq!(
            diag.code, expected_code,
            "Expected error code {}, got {} ({})",
            expected_code, diag.code, diag.message
        ),
        Ok(val) => panic!("Expected error {}, got success: {:?}", expected_code, val),
    }
}

/// Evaluate source that must fail and return the diagnostic
pub fn eval_err(source: &str) -> Diagnostic {
    match runtime().eval(source) {
        Err(diag) => diag,
        Ok(val) => panic!("Expected error, got success: {:?}", val),
    }
}
