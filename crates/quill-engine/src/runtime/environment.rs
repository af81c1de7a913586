//! Lexical environments for variable binding.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// A frame in the scope chain.
///
/// Cloning an `Environment` clones the handle, not the frame: closures
/// and the code that created them share one set of bindings.
#[derive(Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

#[derive(Default)]
struct Scope {
    /// The bindings in this frame
    bindings: FxHashMap<String, Value>,
    /// The outer (parent) frame
    outer: Option<Environment>,
}

impl Environment {
    /// Creates a new global environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new frame whose parent is `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            outer: Some(self.clone()),
        })))
    }

    /// Returns the parent frame, if any.
    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    /// Declares `name` in this frame, shadowing any outer binding.
    pub fn declare(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Reads `name` from the nearest frame that declares it.
    ///
    /// Undeclared names read as `undefined`.
    pub fn read(&self, name: &str) -> Value {
        self.owner(name)
            .and_then(|env| env.0.borrow().bindings.get(name).cloned())
            .unwrap_or_default()
    }

    /// Assigns to `name` in the nearest frame that declares it.
    ///
    /// An undeclared name becomes a binding of the outermost frame.
    pub fn write(&self, name: &str, value: Value) {
        let target = match self.owner(name) {
            Some(env) => env,
            None => {
                debug!(binding = name, "assignment creates implicit global");
                self.root()
            }
        };
        target
            .0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value);
    }

    /// Removes the nearest binding of `name`, returning whether one existed.
    pub fn delete(&self, name: &str) -> bool {
        match self.owner(name) {
            Some(env) => env.0.borrow_mut().bindings.remove(name).is_some(),
            None => false,
        }
    }

    /// Returns true if any frame in the chain declares `name`.
    pub fn has_binding(&self, name: &str) -> bool {
        self.owner(name).is_some()
    }

    /// Returns true if this frame itself declares `name`.
    pub fn has_own_binding(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Finds the nearest frame that declares `name`.
    fn owner(&self, name: &str) -> Option<Environment> {
        let mut env = self.clone();
        loop {
            if env.has_own_binding(name) {
                return Some(env);
            }
            env = env.outer()?;
        }
    }

    /// Returns the outermost frame of the chain.
    fn root(&self) -> Environment {
        let mut env = self.clone();
        while let Some(outer) = env.outer() {
            env = outer;
        }
        env
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut env = self.clone();
        while let Some(outer) = env.outer() {
            depth += 1;
            env = outer;
        }
        depth
    }
}

/// Frames can be reached again through the closures they hold, so only
/// the local names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .field("bindings", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_undeclared_is_undefined() {
        let env = Environment::new();
        assert_eq!(env.read("missing"), Value::Undefined);
    }

    #[test]
    fn test_declare_and_read() {
        let env = Environment::new();
        env.declare("x", Value::Number(1.0));
        assert_eq!(env.read("x"), Value::Number(1.0));
    }

    #[test]
    fn test_child_reads_outer() {
        let global = Environment::new();
        global.declare("x", Value::Number(1.0));
        let inner = global.child();
        assert_eq!(inner.read("x"), Value::Number(1.0));
    }

    #[test]
    fn test_declare_shadows_outer() {
        let global = Environment::new();
        global.declare("x", Value::Number(3.0));
        let inner = global.child();
        inner.declare("x", Value::Number(4.0));

        assert_eq!(inner.read("x"), Value::Number(4.0));
        assert_eq!(global.read("x"), Value::Number(3.0));
    }

    #[test]
    fn test_write_updates_owning_frame() {
        let global = Environment::new();
        global.declare("x", Value::Number(1.0));
        let inner = global.child().child();
        inner.write("x", Value::Number(2.0));

        assert_eq!(global.read("x"), Value::Number(2.0));
        assert!(!inner.has_own_binding("x"));
    }

    #[test]
    fn test_write_undeclared_creates_global() {
        let global = Environment::new();
        let inner = global.child();
        inner.write("y", Value::from("set"));

        assert!(global.has_own_binding("y"));
        assert!(!inner.has_own_binding("y"));
        assert_eq!(global.read("y"), Value::from("set"));
    }

    #[test]
    fn test_delete() {
        let global = Environment::new();
        global.declare("x", Value::Number(1.0));
        let inner = global.child();
        inner.declare("x", Value::Number(2.0));

        assert!(inner.delete("x"));
        assert_eq!(inner.read("x"), Value::Number(1.0));
        assert!(inner.delete("x"));
        assert!(!inner.has_binding("x"));
        assert!(!inner.delete("x"));
    }

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::new();
        let alias = env.clone();
        alias.declare("shared", Value::Boolean(true));
        assert_eq!(env.read("shared"), Value::Boolean(true));
    }

    #[test]
    fn test_debug_lists_names() {
        let env = Environment::new().child();
        env.declare("b", Value::Null);
        env.declare("a", Value::Null);
        assert_eq!(
            format!("{:?}", env),
            r#"Environment { depth: 1, bindings: ["a", "b"] }"#
        );
    }
}
