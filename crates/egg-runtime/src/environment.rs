//! Lexical environments
//!
//! An environment is a scope of bindings with an optional parent. Handles are cheap to clone
//! and alias the same scope: a closure holding a handle sees every later `define` made in it.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

/// Shared handle to one scope in the environment chain
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// Create a root environment with no parent
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    /// Create an empty child scope whose lookups fall back to `parent`
    pub fn with_parent(parent: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    /// Bind `name` in this scope only, replacing any local binding of the same name
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Look `name` up from this scope outward to the root
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// Number of scopes from here to the root, counting this one
    pub fn depth(&self) -> usize {
        1 + self.parent().map_or(0, |parent| parent.depth())
    }

    /// Local bindings sorted by name
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        let mut bindings: Vec<(String, Value)> = self
            .0
            .borrow()
            .bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    /// Whether two handles refer to the same scope
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Bindings can hold closures that point back at this scope, so only names are printed
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.local_bindings().into_iter().map(|(name, _)| name).collect();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_to_root() {
        let global = Environment::new();
        global.define("x", Value::Number(1.0));
        let child = Environment::with_parent(&global);
        let grandchild = Environment::with_parent(&child);

        assert_eq!(grandchild.get("x"), Some(Value::Number(1.0)));
        assert_eq!(grandchild.get("missing"), None);
        assert_eq!(grandchild.depth(), 3);
    }

    #[test]
    fn test_define_shadows_without_touching_parent() {
        let global = Environment::new();
        global.define("x", Value::Number(1.0));
        let child = Environment::with_parent(&global);
        child.define("x", Value::Number(2.0));

        assert_eq!(child.get("x"), Some(Value::Number(2.0)));
        assert_eq!(global.get("x"), Some(Value::Number(1.0)));
        assert_eq!(child.local_bindings(), vec![("x".to_string(), Value::Number(2.0))]);
    }

    #[test]
    fn test_clones_alias_the_same_scope() {
        let env = Environment::new();
        let alias = env.clone();
        alias.define("late", Value::Bool(true));

        assert_eq!(env.get("late"), Some(Value::Bool(true)));
        assert!(env.ptr_eq(&alias));
    }

    #[test]
    fn test_child_sees_later_parent_definitions() {
        let global = Environment::new();
        let child = Environment::with_parent(&global);
        global.define("y", Value::string("later"));

        assert_eq!(child.get("y"), Some(Value::string("later")));
    }

    #[test]
    fn test_local_bindings_sorted() {
        let env = Environment::new();
        env.define("b", Value::Number(2.0));
        env.define("a", Value::Number(1.0));
        let names: Vec<String> = env.local_bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
