use crate::error::{ErrorKind, ZyError};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Frame {
    values: HashMap<String, Value>,
    enclosing: Option<Environment>,
}

/// Handle to a shared scope frame.
///
/// Cloning the handle shares the frame: closures keep their defining frame
/// alive for as long as they exist, independent of the call that made it.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: &Environment) -> Self {
        Self {
            frame: Rc::new(RefCell::new(Frame {
                values: HashMap::new(),
                enclosing: Some(enclosing.clone()),
            })),
        }
    }

    /// Binds `name` in this frame, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.frame.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Rebinds `name` in the nearest frame that already has it.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ZyError> {
        let mut env = self.clone();
        loop {
            let enclosing = {
                let mut frame = env.frame.borrow_mut();
                if let Some(slot) = frame.values.get_mut(name) {
                    *slot = value;
                    return Ok(());
                }
                frame.enclosing.clone()
            };
            match enclosing {
                Some(parent) => env = parent,
                None => {
                    return Err(ZyError::fatal(ErrorKind::UndefinedVariable(name.to_string())))
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let mut env = self.clone();
        loop {
            let enclosing = {
                let frame = env.frame.borrow();
                if let Some(value) = frame.values.get(name) {
                    return Some(value.clone());
                }
                frame.enclosing.clone()
            };
            env = enclosing?;
        }
    }

    pub fn is_defined_locally(&self, name: &str) -> bool {
        self.frame.borrow().values.contains_key(name)
    }
}
