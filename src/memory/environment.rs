//! Local bindings of one function activation
//!
//! Every call gets a fresh [`Environment`]; nothing is shared between
//! activations, so a recursive call can never observe its caller's locals.
//!
//! Blocks (`{ ... }`, `if`/`while` bodies) open a nested scope inside the
//! environment. Names declared in a scope are dropped when it closes. A name
//! may not be declared again while an earlier binding of it is still visible,
//! so there is no shadowing to undo.

use super::registry::TypeDescriptor;
use super::value::Value;
use rustc_hash::FxHashMap;

/// A local variable: its current value and declared type
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub value: Value,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub function_name: String,
    locals: FxHashMap<String, LocalVar>,
    /// Names declared in each open nested scope, innermost last
    scope_stack: Vec<Vec<String>>,
}

impl Environment {
    pub fn new(function_name: impl Into<String>) -> Self {
        Environment {
            function_name: function_name.into(),
            locals: FxHashMap::default(),
            scope_stack: Vec::new(),
        }
    }

    /// Enter a nested scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(Vec::new());
    }

    /// Leave the innermost scope, dropping what it declared
    pub fn pop_scope(&mut self) {
        if let Some(declared) = self.scope_stack.pop() {
            for name in declared {
                self.locals.remove(&name);
            }
        }
    }

    /// Bind a new local in the innermost scope
    ///
    /// Returns `false` (and leaves the environment untouched) when the name is
    /// already visible.
    pub fn declare(
        &mut self,
        name: &str,
        ty: TypeDescriptor,
        value: Value,
    ) -> bool {
        if self.locals.contains_key(name) {
            return false;
        }
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.push(name.to_string());
        }
        self.locals.insert(name.to_string(), LocalVar { value, ty });
        true
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.locals.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LocalVar> {
        self.locals.get_mut(name)
    }

    /// Number of visible locals
    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    /// Nesting depth of block scopes
    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut env = Environment::new("main");
        assert!(env.declare("x", TypeDescriptor::Int, Value::Int(3)));

        let var = env.get("x").unwrap();
        assert_eq!(var.value, Value::Int(3));
        assert_eq!(var.ty, TypeDescriptor::Int);
        assert!(env.get("y").is_none());
    }

    #[test]
    fn test_redeclaration_rejected() {
        let mut env = Environment::new("main");
        assert!(env.declare("x", TypeDescriptor::Int, Value::Int(1)));
        assert!(!env.declare("x", TypeDescriptor::Char, Value::Char(2)));

        // First binding is untouched
        assert_eq!(env.get("x").unwrap().value, Value::Int(1));
    }

    #[test]
    fn test_nested_scope_drops_its_names() {
        let mut env = Environment::new("f");
        env.declare("outer", TypeDescriptor::Int, Value::Int(1));

        env.push_scope();
        env.declare("inner", TypeDescriptor::Int, Value::Int(2));
        assert!(!env.declare("outer", TypeDescriptor::Int, Value::Int(3)));
        assert_eq!(env.scope_depth(), 1);
        env.pop_scope();

        assert!(env.is_declared("outer"));
        assert!(!env.is_declared("inner"));

        // The name is free again once its scope closed
        env.push_scope();
        assert!(env.declare("inner", TypeDescriptor::Char, Value::Char(0)));
        env.pop_scope();
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_get_mut_updates_value() {
        let mut env = Environment::new("f");
        env.declare("n", TypeDescriptor::Int, Value::Int(0));
        env.get_mut("n").unwrap().value = Value::Int(7);

        assert_eq!(env.get("n").unwrap().value, Value::Int(7));
    }
}
