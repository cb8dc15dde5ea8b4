use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single scope frame plus a link to the enclosing one.
///
/// Frames are shared through `Rc`: a closure keeps its defining frame alive,
/// and a call frame keeps the closure's frame alive through `parent`. The
/// parent link is fixed at construction, so a chain can only grow downward.
#[derive(Debug, Default)]
pub struct Environment {
    store: RefCell<HashMap<Rc<str>, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// A fresh root scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A child scope enclosed by `parent`.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds `name` in this frame, shadowing any outer binding.
    pub fn set(&self, name: impl Into<Rc<str>>, value: Value) {
        self.store.borrow_mut().insert(name.into(), value);
    }

    /// Looks `name` up from this frame outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }
}
