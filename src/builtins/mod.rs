//! Builtin library registered into the global scope.
//!
//! Every builtin takes one argument per application step; multi-argument
//! builtins return intermediate natives until the last argument arrives.
//! Operators dispatch to these by name, so they are ordinary rebindable
//! globals.

mod io;
mod lists;
mod logic;
mod numeric;
mod text;

use crate::environment::Environment;
use crate::error::{ErrorKind, Result, ZyError};
use crate::evaluator::Evaluator;
use crate::value::Value;
use regex::Regex;
use std::rc::Rc;

type Builtin1 = fn(&mut Evaluator, Value) -> Result<Value>;
type Builtin2 = fn(&mut Evaluator, Value, Value) -> Result<Value>;
type Builtin3 = fn(&mut Evaluator, Value, Value, Value) -> Result<Value>;

/// Register every builtin into `globals`.
pub fn register(globals: &Environment) {
    numeric::register(globals);
    logic::register(globals);
    lists::register(globals);
    text::register(globals);
    io::register(globals);
}

fn define1(globals: &Environment, name: &'static str, function: Builtin1) {
    globals.define(name, Value::native(name, function));
}

fn define2(globals: &Environment, name: &'static str, function: Builtin2) {
    globals.define(
        name,
        Value::native(name, move |_, a| {
            Ok(Value::native(name, move |evaluator, b| function(evaluator, a.clone(), b)))
        }),
    );
}

fn define3(globals: &Environment, name: &'static str, function: Builtin3) {
    globals.define(
        name,
        Value::native(name, move |_, a| {
            Ok(Value::native(name, move |_, b| {
                let a = a.clone();
                Ok(Value::native(name, move |evaluator, c| {
                    function(evaluator, a.clone(), b.clone(), c)
                }))
            }))
        }),
    );
}

fn number(builtin: &'static str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(ZyError::wrong_kind(builtin, "number", other.type_name())),
    }
}

fn string(builtin: &'static str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ZyError::wrong_kind(builtin, "string", other.type_name())),
    }
}

fn list(builtin: &'static str, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(ZyError::wrong_kind(builtin, "list", other.type_name())),
    }
}

fn compiled(builtin: &'static str, value: &Value) -> Result<Rc<Regex>> {
    match value {
        Value::Regex(re) => Ok(Rc::clone(re)),
        other => Err(ZyError::wrong_kind(builtin, "regex", other.type_name())),
    }
}

/// Counts and indices are truncated toward zero and must not be negative.
fn count(builtin: &'static str, value: &Value) -> Result<usize> {
    let n = number(builtin, value)?;
    if !n.is_finite() || n < 0.0 {
        return Err(ZyError::builtin(
            builtin,
            format!("expected a non-negative whole number but got {}", value),
        ));
    }
    Ok(n.trunc() as usize)
}

fn out_of_range(builtin: &'static str, index: usize, len: usize) -> ZyError {
    ZyError::fatal(ErrorKind::IndexOutOfRange {
        builtin,
        index,
        len,
    })
}
