use super::{define1, define2, string};
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::value::Value;

pub fn register(globals: &Environment) {
    define2(globals, "eq", eq);
    define2(globals, "neq", neq);

    // Both operands are evaluated before these run; nothing short-circuits.
    define2(globals, "and", and);
    define2(globals, "or", or);
    define1(globals, "not", not);

    define2(globals, "compose", compose);
    define1(globals, "global", global);
}

fn eq(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a == b))
}

fn neq(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a != b))
}

fn and(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a.is_truthy() && b.is_truthy()))
}

fn or(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    Ok(Value::Bool(a.is_truthy() || b.is_truthy()))
}

fn not(_: &mut Evaluator, a: Value) -> Result<Value> {
    Ok(Value::Bool(!a.is_truthy()))
}

/// Pipe: `x . f` is `f(x)`.
fn compose(evaluator: &mut Evaluator, x: Value, f: Value) -> Result<Value> {
    evaluator.apply(&f, x)
}

fn global(evaluator: &mut Evaluator, name: Value) -> Result<Value> {
    let name = string("global", name)?;
    Ok(evaluator.globals().get(&name).unwrap_or(Value::Nil))
}
