use super::{compiled, define1, define2, define3, list, string};
use crate::environment::Environment;
use crate::error::{ErrorKind, Result, ZyError};
use crate::evaluator::Evaluator;
use crate::value::Value;
use regex::Regex;
use std::rc::Rc;

pub fn register(globals: &Environment) {
    define1(globals, "toNum", to_num);
    define1(globals, "toStr", to_str);
    define1(globals, "toBool", to_bool);

    define1(globals, "regex", compile);
    define2(globals, "match", is_match);
    define3(globals, "replace", replace);
    define2(globals, "split", split);
    define2(globals, "join", join);
}

fn to_num(_: &mut Evaluator, value: Value) -> Result<Value> {
    match value {
        Value::Number(n) => Ok(Value::Number(n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| ZyError::builtin("toNum", format!("cannot convert \"{}\" to a number", s))),
        other => Err(ZyError::wrong_kind("toNum", "string", other.type_name())),
    }
}

fn to_str(_: &mut Evaluator, value: Value) -> Result<Value> {
    Ok(Value::String(value.to_string()))
}

fn to_bool(_: &mut Evaluator, value: Value) -> Result<Value> {
    Ok(Value::Bool(value.is_truthy()))
}

fn compile(_: &mut Evaluator, pattern: Value) -> Result<Value> {
    let pattern = string("regex", pattern)?;
    let re = Regex::new(&pattern).map_err(|e| ZyError::fatal(ErrorKind::InvalidRegex(e.to_string())))?;
    Ok(Value::Regex(Rc::new(re)))
}

/// True only when the pattern matches the whole text.
fn is_match(_: &mut Evaluator, re: Value, text: Value) -> Result<Value> {
    let re = compiled("match", &re)?;
    let text = string("match", text)?;
    let anchored = Regex::new(&format!("^(?:{})$", re.as_str()))
        .map_err(|e| ZyError::fatal(ErrorKind::InvalidRegex(e.to_string())))?;
    Ok(Value::Bool(anchored.is_match(&text)))
}

/// Replaces every match; `$1` in the replacement refers to capture groups.
fn replace(_: &mut Evaluator, re: Value, text: Value, replacement: Value) -> Result<Value> {
    let re = compiled("replace", &re)?;
    let text = string("replace", text)?;
    let replacement = string("replace", replacement)?;
    Ok(Value::String(re.replace_all(&text, replacement.as_str()).into_owned()))
}

fn split(_: &mut Evaluator, re: Value, text: Value) -> Result<Value> {
    let re = compiled("split", &re)?;
    let text = string("split", text)?;
    let parts = re.split(&text).map(Value::from).collect();
    Ok(Value::List(parts))
}

/// `join(list)(separator)`
fn join(_: &mut Evaluator, items: Value, separator: Value) -> Result<Value> {
    let items = list("join", items)?;
    let separator = string("join", separator)?;
    let rendered: Vec<String> = items.iter().map(Value::to_string).collect();
    Ok(Value::String(rendered.join(separator.as_str())))
}
