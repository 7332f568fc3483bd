//! Lexically scoped name bindings.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::object::Object;

/// Shared handle to an environment. Closures hold one of these, so scope
/// chains form a DAG reclaimed when the last closure drops.
pub type Env = Rc<RefCell<Environment>>;

/// A single scope frame: name bindings plus an optional parent frame.
///
/// Lookup walks outward through parents; binding always writes into the
/// local frame, so a `let` of an existing outer name shadows it.
#[derive(Debug, Default)]
pub struct Environment {
    store: AHashMap<String, Rc<Object>>,
    outer: Option<Env>,
}

impl Environment {
    /// Creates an empty top-level environment.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates an environment whose lookups fall back to `outer`.
    ///
    /// One of these is created per function invocation, with the
    /// function's captured environment as the parent.
    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            store: AHashMap::new(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Resolves a name, walking the scope chain outward on a local miss.
    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        match self.store.get(name) {
            Some(value) => Some(Rc::clone(value)),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds a name in this frame, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Rc<Object>) {
        self.store.insert(name.into(), value);
    }
}
