use crate::ast::Expr;
use crate::environment::Environment;
use crate::error::Result;
use crate::evaluator::Evaluator;
use regex::Regex;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Callable(Callable),
    Regex(Rc<Regex>),
}

pub type NativeFn = dyn Fn(&mut Evaluator, Value) -> Result<Value>;

/// Anything that can be applied to exactly one argument.
#[derive(Clone)]
pub enum Callable {
    Closure(Rc<Closure>),
    Native(Rc<Native>),
}

/// One step of a curried user function.
///
/// `params[bound..]` are still waiting for arguments; `env` is the defining
/// scope for the first step and the previous step's frame afterwards.
pub struct Closure {
    pub name: Option<String>,
    pub params: Rc<[String]>,
    pub bound: usize,
    pub body: Rc<Expr>,
    pub env: Environment,
}

pub struct Native {
    pub name: &'static str,
    pub function: Box<NativeFn>,
}

impl Callable {
    pub fn name(&self) -> Option<&str> {
        match self {
            Callable::Closure(closure) => closure.name.as_deref(),
            Callable::Native(native) => Some(native.name),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callable::Closure(closure) => f
                .debug_struct("Closure")
                .field("name", &closure.name)
                .field("params", &closure.params)
                .field("bound", &closure.bound)
                .finish_non_exhaustive(),
            Callable::Native(native) => f.debug_struct("Native").field("name", &native.name).finish(),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Closure(a), Callable::Closure(b)) => Rc::ptr_eq(a, b),
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn native<F>(name: &'static str, function: F) -> Self
    where
        F: Fn(&mut Evaluator, Value) -> Result<Value> + 'static,
    {
        Value::Callable(Callable::Native(Rc::new(Native {
            name,
            function: Box::new(function),
        })))
    }

    /// Only `Nil` and `false` are falsy. `if` does not use this; it demands
    /// exactly `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Callable(_) => "function",
            Value::Regex(_) => "regex",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::List(l), Value::List(r)) => l == r,
            (Value::Callable(l), Value::Callable(r)) => l == r,
            (Value::Regex(l), Value::Regex(r)) => l.as_str() == r.as_str(),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                // Whole numbers print without a fractional part.
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, item) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Callable(callable) => match callable.name() {
                Some(name) => write!(f, "<function {}>", name),
                None => write!(f, "<function>"),
            },
            Value::Regex(re) => write!(f, "{}", re.as_str()),
        }
    }
}
