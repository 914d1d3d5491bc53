//! The environment chain: name → value bindings with lexical nesting.
//!
//! Environments live in an arena addressed by [`EnvId`] rather than behind
//! `Rc<RefCell<_>>` parent pointers. A closure capturing its own enclosing
//! scope, or a class whose methods close over an environment that (via
//! `this`) can reach back to an instance of that very class, forms a cycle
//! no reference count ever drops to zero on its own; an arena that simply
//! never frees sidesteps the problem the same way `lox_util::IndexVec` was
//! built for.

use lox_lex::Token;
use lox_util::{define_idx, FxHashMap, IndexVec};

use crate::error::RuntimeError;
use crate::value::Value;

define_idx!(EnvId);

struct Scope {
    values: FxHashMap<String, Value>,
    parent: Option<EnvId>,
}

/// The arena of all environments live during a run, plus the root.
pub struct Environment {
    scopes: IndexVec<EnvId, Scope>,
    globals: EnvId,
}

impl Environment {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let globals = scopes.push(Scope { values: FxHashMap::default(), parent: None });
        Self { scopes, globals }
    }

    pub fn globals(&self) -> EnvId {
        self.globals
    }

    /// Creates a new scope chained under `parent`.
    pub fn child(&mut self, parent: EnvId) -> EnvId {
        self.scopes.push(Scope { values: FxHashMap::default(), parent: Some(parent) })
    }

    /// Defines (or silently replaces) a binding in `scope`.
    pub fn define(&mut self, scope: EnvId, name: impl Into<String>, value: Value) {
        self.scopes[scope].values.insert(name.into(), value);
    }

    /// Looks up `name` starting at `scope`, walking outward.
    pub fn get(&self, scope: EnvId, name: &Token) -> Result<Value, RuntimeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(value) = self.scopes[id].values.get(&name.lexeme) {
                return Ok(value.clone());
            }
            current = self.scopes[id].parent;
        }
        Err(undefined_variable(name))
    }

    /// Assigns to the nearest enclosing binding of `name`, walking outward
    /// from `scope`. Fails if no such binding exists anywhere in the chain
    /// — Lox has no implicit global creation on assignment.
    pub fn assign(&mut self, scope: EnvId, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scopes[id].values.contains_key(&name.lexeme) {
                self.scopes[id].values.insert(name.lexeme.clone(), value);
                return Ok(());
            }
            current = self.scopes[id].parent;
        }
        Err(undefined_variable(name))
    }

    /// Chases the parent link exactly `distance` times. Callers (resolved
    /// lookups only) must ensure `distance` is in range; the resolver's
    /// own invariant guarantees it always is.
    fn ancestor(&self, scope: EnvId, distance: u32) -> EnvId {
        let mut current = scope;
        for _ in 0..distance {
            current = self.scopes[current]
                .parent
                .expect("resolver-computed distance exceeds the environment chain's depth");
        }
        current
    }

    pub fn get_at(&self, scope: EnvId, distance: u32, name: &str) -> Value {
        let target = self.ancestor(scope, distance);
        self.scopes[target]
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("resolver resolved `{name}` to a scope that never defined it"))
    }

    pub fn assign_at(&mut self, scope: EnvId, distance: u32, name: &Token, value: Value) {
        let target = self.ancestor(scope, distance);
        self.scopes[target].values.insert(name.lexeme.clone(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(lox_util::Span::new(name.line), format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(name: &str) -> Token {
        Token::new(lox_lex::TokenKind::Identifier, name, 1)
    }

    #[test]
    fn shadowing_inner_scope_hides_outer() {
        let mut env = Environment::new();
        let root = env.globals();
        env.define(root, "n", Value::Number(1.0));
        let child = env.child(root);
        env.define(child, "n", Value::Number(2.0));
        assert_eq!(env.get(child, &tok("n")).unwrap(), Value::Number(2.0));
        assert_eq!(env.get(root, &tok("n")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_reaches_through_the_chain() {
        let mut env = Environment::new();
        let root = env.globals();
        env.define(root, "n", Value::Number(1.0));
        let child = env.child(root);
        env.assign(child, &tok("n"), Value::Number(9.0)).unwrap();
        assert_eq!(env.get(root, &tok("n")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn get_undefined_fails() {
        let env = Environment::new();
        let root = env.globals();
        assert!(env.get(root, &tok("missing")).is_err());
    }

    #[test]
    fn assign_undefined_fails_rather_than_creating_global() {
        let mut env = Environment::new();
        let root = env.globals();
        assert!(env.assign(root, &tok("missing"), Value::Nil).is_err());
    }

    #[test]
    fn get_at_and_assign_at_use_exact_distance() {
        let mut env = Environment::new();
        let root = env.globals();
        env.define(root, "n", Value::Number(1.0));
        let child = env.child(root);
        env.define(child, "n", Value::Number(2.0));
        assert_eq!(env.get_at(child, 1, "n"), Value::Number(1.0));
        env.assign_at(child, 1, &tok("n"), Value::Number(42.0));
        assert_eq!(env.get_at(child, 1, "n"), Value::Number(42.0));
        assert_eq!(env.get_at(child, 0, "n"), Value::Number(2.0));
    }
}
