//! Special forms
//!
//! Handlers receive their argument nodes unevaluated and decide themselves what to evaluate
//! and when. That is what lets `if` skip the untaken branch and `while` re-run its guard.

use super::Interpreter;
use crate::ast::Node;
use crate::diagnostic::error_codes;
use crate::environment::Environment;
use crate::error::{EggResult, Error};
use crate::span::Span;
use crate::value::{Closure, Function, Value};
use std::rc::Rc;

pub(super) type SpecialForm =
    fn(&mut Interpreter, &[Node], &Environment, Span) -> EggResult<Value>;

/// Names reserved for special forms
pub const SPECIAL_FORMS: [&str; 5] = ["if", "while", "do", "define", "fun"];

pub fn is_special_form(name: &str) -> bool {
    lookup(name).is_some()
}

pub(super) fn lookup(name: &str) -> Option<SpecialForm> {
    let form: SpecialForm = match name {
        "if" => eval_if,
        "while" => eval_while,
        "do" => eval_do,
        "define" => eval_define,
        "fun" => eval_fun,
        _ => return None,
    };
    Some(form)
}

fn bad_form(message: impl Into<String>, span: Span) -> Error {
    Error::syntax(error_codes::BAD_SPECIAL_FORM, message, span)
}

fn expect_args(form: &str, args: &[Node], count: usize, span: Span) -> EggResult<()> {
    if args.len() != count {
        return Err(bad_form(
            format!(
                "bad number of arguments to {}: expected {}, got {}",
                form,
                count,
                args.len()
            ),
            span,
        ));
    }
    Ok(())
}

/// `if(cond, then, else)`: only the boolean `false` selects the else branch
fn eval_if(interp: &mut Interpreter, args: &[Node], env: &Environment, span: Span) -> EggResult<Value> {
    expect_args("if", args, 3, span)?;
    if interp.evaluate(&args[0], env)?.is_truthy() {
        interp.evaluate(&args[1], env)
    } else {
        interp.evaluate(&args[2], env)
    }
}

/// `while(cond, body)`: always yields `false` once the guard fails
fn eval_while(interp: &mut Interpreter, args: &[Node], env: &Environment, span: Span) -> EggResult<Value> {
    expect_args("while", args, 2, span)?;
    while interp.evaluate(&args[0], env)?.is_truthy() {
        interp.evaluate(&args[1], env)?;
    }
    Ok(Value::Bool(false))
}

/// `do(a, b, ...)`: value of the last argument, `false` when empty
fn eval_do(interp: &mut Interpreter, args: &[Node], env: &Environment, _span: Span) -> EggResult<Value> {
    let mut value = Value::Bool(false);
    for arg in args {
        value = interp.evaluate(arg, env)?;
    }
    Ok(value)
}

/// `define(name, value)`: binds in the innermost scope only
fn eval_define(interp: &mut Interpreter, args: &[Node], env: &Environment, span: Span) -> EggResult<Value> {
    expect_args("define", args, 2, span)?;
    let name = args[0].as_word().ok_or_else(|| {
        bad_form(
            format!("bad use of define: target must be a word, got {}", args[0]),
            args[0].span(),
        )
    })?;

    let value = interp.evaluate(&args[1], env)?;
    tracing::debug!(name, value = %value, "define");
    env.define(name, value.clone());
    Ok(value)
}

/// `fun(p1, ..., pn, body)`: closes over the environment it is evaluated in
fn eval_fun(_interp: &mut Interpreter, args: &[Node], env: &Environment, span: Span) -> EggResult<Value> {
    let Some((body, params)) = args.split_last() else {
        return Err(bad_form("functions need a body", span));
    };

    let params = params
        .iter()
        .map(|param| {
            param.as_word().map(str::to_string).ok_or_else(|| {
                bad_form(
                    format!("parameter names must be words, got {}", param),
                    param.span(),
                )
            })
        })
        .collect::<EggResult<Vec<String>>>()?;

    Ok(Value::Function(Function::Closure(Rc::new(Closure {
        params,
        body: body.clone(),
        env: env.clone(),
    }))))
}
