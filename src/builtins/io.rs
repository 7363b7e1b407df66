use super::define1;
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::value::Value;

pub fn register(globals: &Environment) {
    define1(globals, "print", print);
    define1(globals, "read", read);
}

fn print(evaluator: &mut Evaluator, value: Value) -> Result<Value> {
    evaluator.write_line(&value.to_string())?;
    Ok(Value::Nil)
}

/// Next input line, or Nil once input is exhausted. Blocks until a line is
/// available.
fn read(evaluator: &mut Evaluator, _: Value) -> Result<Value> {
    Ok(evaluator.read_line()?.map(Value::String).unwrap_or(Value::Nil))
}
