use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;
use zy::error::{ErrorKind, ZyError};
use zy::{Config, Evaluator, Value};

/// Output sink that tests can inspect after the evaluator has written to it.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn eval(source: &str) -> Result<Value, ZyError> {
    Evaluator::with_io(Config::quiet(), Box::new(io::empty()), Box::new(io::sink())).run_source(source)
}

fn eval_ok(source: &str) -> Value {
    match eval(source) {
        Ok(value) => value,
        Err(error) => panic!("`{}` failed: {}", source, error),
    }
}

fn eval_err(source: &str) -> ErrorKind {
    match eval(source) {
        Ok(value) => panic!("`{}` should fail but gave {}", source, value),
        Err(error) => error.kind,
    }
}

fn numbers(values: &[f64]) -> Value {
    Value::List(values.iter().copied().map(Value::Number).collect())
}

fn strings(values: &[&str]) -> Value {
    Value::List(values.iter().map(|s| Value::from(*s)).collect())
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn numeric_builtins() {
    assert_eq!(eval_ok("mod(7, 3)"), Value::Number(1.0));
    assert_eq!(eval_ok("neg(4)"), Value::Number(-4.0));
    assert_eq!(eval_ok("range(0, 5)"), numbers(&[0.0, 1.0, 2.0, 3.0, 4.0]));
    assert_eq!(eval_ok("range(3, 1)"), numbers(&[]));
}

#[test]
fn division_by_zero_is_infinite() {
    match eval_ok("1 / 0") {
        Value::Number(n) => assert!(n.is_infinite() && n > 0.0),
        other => panic!("expected a number, got {}", other),
    }
}

#[test]
fn arithmetic_rejects_non_numbers() {
    assert_eq!(
        eval_err("1 + \"2\""),
        ErrorKind::WrongKind {
            builtin: "add",
            expected: "number",
            found: "string",
        }
    );
    assert_eq!(
        eval_err("neg([])"),
        ErrorKind::WrongKind {
            builtin: "neg",
            expected: "number",
            found: "list",
        }
    );
}

#[test]
fn builtins_partially_apply() {
    assert_eq!(eval_ok("let inc :: add(1) in map([1, 2], inc)"), numbers(&[2.0, 3.0]));
}

// ============================================================================
// Logic
// ============================================================================

#[test]
fn equality_is_structural() {
    assert_eq!(eval_ok("[1, [2, \"a\"]] = [1, [2, \"a\"]]"), Value::Bool(true));
    assert_eq!(eval_ok("1 = \"1\""), Value::Bool(false));
    assert_eq!(eval_ok("1 != 2"), Value::Bool(true));
    assert_eq!(eval_ok("add = add"), Value::Bool(true));
    assert_eq!(eval_ok("regex(\"a\") = regex(\"a\")"), Value::Bool(true));
}

#[test]
fn global_looks_up_by_name() {
    assert_eq!(eval_ok("global(\"add\")(1, 2)"), Value::Number(3.0));
    assert_eq!(eval_ok("global(\"nope\")"), Value::Nil);
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn element_access() {
    assert_eq!(eval_ok("nth(1, [\"a\", \"b\"])"), Value::from("b"));
    assert_eq!(eval_ok("nth(1.9, [\"a\", \"b\"])"), Value::from("b"));
    assert_eq!(
        eval_err("nth(5, [1])"),
        ErrorKind::IndexOutOfRange {
            builtin: "nth",
            index: 5,
            len: 1,
        }
    );
    assert_eq!(eval_ok("head([7, 8])"), Value::Number(7.0));
    assert_eq!(
        eval_err("head([])"),
        ErrorKind::Builtin {
            builtin: "head",
            message: "empty list".to_string(),
        }
    );
    assert_eq!(eval_ok("tail([1])"), numbers(&[]));
    assert_eq!(eval_ok("tail([])"), numbers(&[]));
    assert_eq!(eval_ok("len([1, 2])"), Value::Number(2.0));
    assert_eq!(
        eval_err("len(\"ab\")"),
        ErrorKind::WrongKind {
            builtin: "len",
            expected: "list",
            found: "string",
        }
    );
}

#[test]
fn higher_order_list_functions() {
    assert_eq!(
        eval_ok("filter([1, 2, 3, 4], fn(x) :: mod(x, 2) = 0 end)"),
        numbers(&[2.0, 4.0])
    );
    assert_eq!(eval_ok("reduce([1, 2, 3, 4], mul)"), Value::Number(24.0));
    assert!(matches!(eval_err("reduce([], add)"), ErrorKind::Builtin { builtin: "reduce", .. }));
    assert_eq!(eval_ok("zip([add(1), mul(2)], [10, 20])"), numbers(&[11.0, 40.0]));
    assert_eq!(eval_ok("zipWith([1, 2], add, [10, 20])"), numbers(&[11.0, 22.0]));
    assert_eq!(eval_ok("zipWith([1, 2, 3], sub, [1])"), numbers(&[0.0]));
}

#[test]
fn folds_run_in_opposite_directions() {
    assert_eq!(eval_ok("foldl(0, add, [1, 2, 3])"), Value::Number(6.0));
    assert_eq!(
        eval_ok("foldl(\"\", fn(acc, x) :: acc .. x end, [\"a\", \"b\", \"c\"])"),
        Value::from("abc")
    );
    assert_eq!(
        eval_ok("foldr(\"\", fn(x, acc) :: acc .. x end, [\"a\", \"b\", \"c\"])"),
        Value::from("cba")
    );
}

#[test]
fn list_editing() {
    assert_eq!(
        eval_ok("plus([1], [2])"),
        Value::List(vec![Value::Number(1.0), numbers(&[2.0])])
    );
    assert_eq!(eval_ok("minus([1, 2, 1], 1)"), numbers(&[2.0, 1.0]));
    assert_eq!(eval_ok("minus([1], 5)"), numbers(&[1.0]));
    assert_eq!(eval_ok("drop([1, 2, 3], 1)"), numbers(&[2.0, 3.0]));
    assert_eq!(eval_ok("take([1, 2, 3], 2)"), numbers(&[1.0, 2.0]));
    assert_eq!(eval_ok("take([1], 5)"), numbers(&[1.0]));
    assert!(matches!(eval_err("drop([1, 2], -1)"), ErrorKind::Builtin { builtin: "drop", .. }));
    assert_eq!(eval_ok("reverse([1, 2, 3])"), numbers(&[3.0, 2.0, 1.0]));
}

#[test]
fn slice_bounds_are_inclusive() {
    assert_eq!(eval_ok("slice([1, 2, 3, 4], 1, 2)"), numbers(&[2.0, 3.0]));
    assert_eq!(eval_ok("slice([1, 2], 1, 0)"), numbers(&[]));
    assert_eq!(
        eval_err("slice([1, 2], 0, 2)"),
        ErrorKind::IndexOutOfRange {
            builtin: "slice",
            index: 2,
            len: 2,
        }
    );
}

#[test]
fn concat_on_lists_and_strings() {
    assert_eq!(eval_ok("\"a\" .. 1"), Value::from("a1"));
    assert_eq!(eval_ok("1..2"), Value::from("12"));
    assert_eq!(eval_ok("1 .. [2]"), Value::from("1[2]"));
    assert_eq!(eval_ok("[1] .. [2, 3]"), numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(eval_ok("[1] .. 2"), numbers(&[1.0, 2.0]));
}

#[test]
fn sort_accepts_numbers_only() {
    assert_eq!(eval_ok("sort([3, -1, 2.5])"), numbers(&[-1.0, 2.5, 3.0]));
    assert_eq!(
        eval_err("sort([\"a\", \"b\"])"),
        ErrorKind::WrongKind {
            builtin: "sort",
            expected: "number",
            found: "string",
        }
    );
}

// ============================================================================
// Text and conversion
// ============================================================================

#[test]
fn conversions() {
    assert_eq!(eval_ok("toNum(\"3.5\")"), Value::Number(3.5));
    assert_eq!(eval_ok("toNum(\" 42 \")"), Value::Number(42.0));
    assert!(matches!(eval_err("toNum(\"x\")"), ErrorKind::Builtin { builtin: "toNum", .. }));
    assert!(matches!(eval_err("toNum(true)"), ErrorKind::WrongKind { builtin: "toNum", .. }));
    assert_eq!(eval_ok("toStr([1, 2])"), Value::from("[1, 2]"));
    assert_eq!(eval_ok("toBool(0)"), Value::Bool(true));
    assert_eq!(eval_ok("toBool(())"), Value::Bool(false));
    assert_eq!(eval_ok("toBool(false)"), Value::Bool(false));
}

#[test]
fn regex_match_is_anchored() {
    assert_eq!(eval_ok("match(regex(\"a+b\"), \"aab\")"), Value::Bool(true));
    assert_eq!(eval_ok("match(regex(\"a\"), \"ab\")"), Value::Bool(false));
    assert_eq!(eval_ok("toStr(regex(\"a+\"))"), Value::from("a+"));
    assert!(matches!(eval_err("regex(\"(\")"), ErrorKind::InvalidRegex(_)));
}

#[test]
fn regex_replace_split_and_join() {
    assert_eq!(
        eval_ok("replace(regex(\"[0-9]+\"), \"a1b22\", \"#\")"),
        Value::from("a#b#")
    );
    assert_eq!(
        eval_ok("replace(regex(\"(\\w+)@(\\w+)\"), \"me@host\", \"$2 at $1\")"),
        Value::from("host at me")
    );
    assert_eq!(eval_ok("split(regex(\",\"), \"a,b,,c\")"), strings(&["a", "b", "", "c"]));
    assert_eq!(eval_ok("join([1, 2, 3], \"-\")"), Value::from("1-2-3"));
}

// ============================================================================
// Input and output
// ============================================================================

#[test]
fn print_writes_the_rendering_and_returns_nil() {
    let output = SharedBuffer::default();
    let mut evaluator = Evaluator::with_io(Config::quiet(), Box::new(io::empty()), Box::new(output.clone()));

    let value = evaluator.run_source("print(\"hi\"); print([1, 2])").unwrap();
    assert_eq!(value, Value::Nil);
    assert_eq!(output.contents(), "hi\n[1, 2]\n");
}

#[test]
fn read_returns_lines_then_nil() {
    let input = Cursor::new(b"first\r\nsecond\n".to_vec());
    let mut evaluator = Evaluator::with_io(Config::quiet(), Box::new(input), Box::new(io::sink()));

    let value = evaluator.run_source("[read(), read(), read()]").unwrap();
    assert_eq!(value, Value::List(vec![Value::from("first"), Value::from("second"), Value::Nil]));
}
