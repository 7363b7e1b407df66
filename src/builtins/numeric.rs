use super::{define1, define2, number};
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::value::Value;

pub fn register(globals: &Environment) {
    define2(globals, "add", add);
    define2(globals, "sub", sub);
    define2(globals, "mul", mul);
    define2(globals, "div", div);
    define2(globals, "mod", modulo);
    define1(globals, "neg", neg);

    define2(globals, "lt", lt);
    define2(globals, "gt", gt);
    define2(globals, "lte", lte);
    define2(globals, "gte", gte);

    define2(globals, "range", range);
}

fn add(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Number(number("add", &a)? + number("add", &b)?))
}

fn sub(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Number(number("sub", &a)? - number("sub", &b)?))
}

fn mul(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Number(number("mul", &a)? * number("mul", &b)?))
}

// IEEE semantics: dividing by zero yields an infinity or NaN.
fn div(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Number(number("div", &a)? / number("div", &b)?))
}

fn modulo(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Number(number("mod", &a)? % number("mod", &b)?))
}

fn neg(_: &mut Evaluator, a: Value) -> Result<Value> {
    Ok(Value::Number(-number("neg", &a)?))
}

fn lt(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(number("lt", &a)? < number("lt", &b)?))
}

fn gt(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(number("gt", &a)? > number("gt", &b)?))
}

fn lte(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(number("lte", &a)? <= number("lte", &b)?))
}

fn gte(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(number("gte", &a)? >= number("gte", &b)?))
}

/// Whole numbers from `from` up to, but excluding, `to`.
fn range(_: &mut Evaluator, from: Value, to: Value) -> Result<Value> {
    let from = number("range", &from)?.trunc() as i64;
    let to = number("range", &to)?.trunc() as i64;
    let items = (from..to).map(|i| Value::Number(i as f64)).collect();
    Ok(Value::List(items))
}

