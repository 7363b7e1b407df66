use super::{count, define1, define2, define3, list, number, out_of_range};
use crate::environment::Environment;
use crate::error::{Result, ZyError};
use crate::evaluator::Evaluator;
use crate::value::Value;

pub fn register(globals: &Environment) {
    define2(globals, "nth", nth);
    define1(globals, "head", head);
    define1(globals, "tail", tail);
    define1(globals, "len", len);

    define2(globals, "map", map);
    define2(globals, "filter", filter);
    define3(globals, "foldl", foldl);
    define3(globals, "foldr", foldr);
    define2(globals, "reduce", reduce);
    define2(globals, "zip", zip);
    define3(globals, "zipWith", zip_with);

    define2(globals, "plus", plus);
    define2(globals, "minus", minus);
    define2(globals, "drop", drop);
    define2(globals, "take", take);
    define3(globals, "slice", slice);
    define2(globals, "concat", concat);
    define1(globals, "reverse", reverse);
    define1(globals, "sort", sort);
}

/// `nth(index)(list)`
fn nth(_: &mut Evaluator, index: Value, items: Value) -> Result<Value> {
    let index = count("nth", &index)?;
    let items = list("nth", items)?;
    let len = items.len();
    items
        .into_iter()
        .nth(index)
        .ok_or_else(|| out_of_range("nth", index, len))
}

fn head(_: &mut Evaluator, items: Value) -> Result<Value> {
    list("head", items)?
        .into_iter()
        .next()
        .ok_or_else(|| ZyError::builtin("head", "empty list"))
}

fn tail(_: &mut Evaluator, items: Value) -> Result<Value> {
    Ok(Value::List(list("tail", items)?.into_iter().skip(1).collect()))
}

fn len(_: &mut Evaluator, items: Value) -> Result<Value> {
    Ok(Value::Number(list("len", items)?.len() as f64))
}

/// `map(list)(fn)`
fn map(evaluator: &mut Evaluator, items: Value, f: Value) -> Result<Value> {
    let items = list("map", items)?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(evaluator.apply(&f, item)?);
    }
    Ok(Value::List(mapped))
}

fn filter(evaluator: &mut Evaluator, items: Value, f: Value) -> Result<Value> {
    let mut kept = Vec::new();
    for item in list("filter", items)? {
        if evaluator.apply(&f, item.clone())?.is_truthy() {
            kept.push(item);
        }
    }
    Ok(Value::List(kept))
}

/// `foldl(init)(fn)(list)`, calling `fn(acc)(item)`.
fn foldl(evaluator: &mut Evaluator, init: Value, f: Value, items: Value) -> Result<Value> {
    let mut acc = init;
    for item in list("foldl", items)? {
        acc = evaluator.call(&f, vec![acc, item])?;
    }
    Ok(acc)
}

/// `foldr(init)(fn)(list)`, calling `fn(item)(acc)` from the right.
fn foldr(evaluator: &mut Evaluator, init: Value, f: Value, items: Value) -> Result<Value> {
    let mut acc = init;
    for item in list("foldr", items)?.into_iter().rev() {
        acc = evaluator.call(&f, vec![item, acc])?;
    }
    Ok(acc)
}

fn reduce(evaluator: &mut Evaluator, items: Value, f: Value) -> Result<Value> {
    let mut items = list("reduce", items)?.into_iter();
    let mut acc = items
        .next()
        .ok_or_else(|| ZyError::builtin("reduce", "empty list"))?;
    for item in items {
        acc = evaluator.call(&f, vec![acc, item])?;
    }
    Ok(acc)
}

/// Applies the i-th function of `fns` to the i-th element of `values`.
fn zip(evaluator: &mut Evaluator, fns: Value, values: Value) -> Result<Value> {
    let fns = list("zip", fns)?;
    let values = list("zip", values)?;
    let mut results = Vec::with_capacity(fns.len().min(values.len()));
    for (f, value) in fns.iter().zip(values) {
        results.push(evaluator.apply(f, value)?);
    }
    Ok(Value::List(results))
}

/// `zipWith(a)(fn)(b)`
fn zip_with(evaluator: &mut Evaluator, a: Value, f: Value, b: Value) -> Result<Value> {
    let a = list("zipWith", a)?;
    let b = list("zipWith", b)?;
    let mut results = Vec::with_capacity(a.len().min(b.len()));
    for (x, y) in a.into_iter().zip(b) {
        results.push(evaluator.call(&f, vec![x, y])?);
    }
    Ok(Value::List(results))
}

/// Appends `item` as a single element, even when it is a list.
fn plus(_: &mut Evaluator, items: Value, item: Value) -> Result<Value> {
    let mut items = list("plus", items)?;
    items.push(item);
    Ok(Value::List(items))
}

/// Removes the first element equal to `item`.
fn minus(_: &mut Evaluator, items: Value, item: Value) -> Result<Value> {
    let mut items = list("minus", items)?;
    if let Some(index) = items.iter().position(|x| *x == item) {
        items.remove(index);
    }
    Ok(Value::List(items))
}

fn drop(_: &mut Evaluator, items: Value, n: Value) -> Result<Value> {
    let items = list("drop", items)?;
    let n = count("drop", &n)?;
    Ok(Value::List(items.into_iter().skip(n).collect()))
}

fn take(_: &mut Evaluator, items: Value, n: Value) -> Result<Value> {
    let items = list("take", items)?;
    let n = count("take", &n)?;
    Ok(Value::List(items.into_iter().take(n).collect()))
}

/// `slice(list)(from)(to)` with `to` inclusive.
fn slice(_: &mut Evaluator, items: Value, from: Value, to: Value) -> Result<Value> {
    let items = list("slice", items)?;
    let from = count("slice", &from)?;
    let to = count("slice", &to)?;
    if to < from {
        return Ok(Value::List(Vec::new()));
    }
    if to >= items.len() {
        return Err(out_of_range("slice", to, items.len()));
    }
    Ok(Value::List(items[from..=to].to_vec()))
}

/// Lists absorb the right operand (spliced when it is a list too); anything
/// else concatenates both renderings as a string.
fn concat(_: &mut Evaluator, a: Value, b: Value) -> Result<Value> {
    match (a, b) {
        (Value::List(mut items), Value::List(more)) => {
            items.extend(more);
            Ok(Value::List(items))
        }
        (Value::List(mut items), item) => {
            items.push(item);
            Ok(Value::List(items))
        }
        (a, b) => Ok(Value::String(format!("{}{}", a, b))),
    }
}

fn reverse(_: &mut Evaluator, items: Value) -> Result<Value> {
    let mut items = list("reverse", items)?;
    items.reverse();
    Ok(Value::List(items))
}

/// Numeric ascending sort; any non-number element is an error.
fn sort(_: &mut Evaluator, items: Value) -> Result<Value> {
    let mut numbers = list("sort", items)?
        .iter()
        .map(|item| number("sort", item))
        .collect::<Result<Vec<f64>>>()?;
    numbers.sort_by(|a, b| a.total_cmp(b));
    Ok(Value::List(numbers.into_iter().map(Value::Number).collect()))
}
