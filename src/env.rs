// ABOUTME: Environment module for managing variable bindings and lexical scopes

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single lexical frame. Bindings are boxed in `Rc<RefCell<Value>>` rather
/// than stored bare so that `letrec` can install a shared, mutable
/// `Unspecified` slot for each name, evaluate every initializer against it,
/// and then assign into the same slot — visible to any closure created
/// during that window that already captured this frame.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Rc<RefCell<Value>>>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope (doesn't walk the parent chain).
    /// Redefining a name in the same frame overwrites its slot.
    pub fn define(&self, name: String, value: Value) {
        self.bindings
            .borrow_mut()
            .insert(name, Rc::new(RefCell::new(value)));
    }

    /// Looks up a symbol in this scope and parent scopes recursively.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(cell) = self.bindings.borrow().get(name) {
            return Some(cell.borrow().clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Mutates an existing binding in place, walking the parent chain
    /// (used by `set!`).
    pub fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if let Some(cell) = self.bindings.borrow().get(name) {
            *cell.borrow_mut() = value;
            return Ok(());
        }
        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }
        Err(EvalError::UndefinedSymbol(name.to_string()))
    }
}
