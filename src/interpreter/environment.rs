use super::builtins::Builtin;
use super::error::Error;
use crate::ast::Block;
use crate::token::Token;
use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A user-defined procedure. It captures no environment: every call runs in
/// a fresh child of the global environment.
#[derive(Debug)]
pub struct Procedure {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Block>,
}

/// What a name resolves to.
#[derive(Debug, Clone)]
pub enum Binding {
    Value(Value),
    Procedure(Rc<Procedure>),
    Builtin(Builtin),
}

/// Represents a single scope level in the environment.
type Scope = IndexMap<String, Binding>;

/// One node of the scope chain. Cloning yields another handle to the same
/// scope; [`Environment::child`] creates a new scope below this one.
#[derive(Debug, Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scope: Rc::new(RefCell::new(IndexMap::new())),
            parent: None,
        }
    }

    pub fn child(&self) -> Self {
        Self {
            scope: Rc::new(RefCell::new(IndexMap::new())),
            parent: Some(Rc::new(self.clone())),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Bind `name` in this scope only.
    pub fn define(&self, name: impl Into<String>, binding: Binding) {
        self.scope.borrow_mut().insert(name.into(), binding);
    }

    /// Assignment. Every non-root ancestor that already binds `name` is
    /// overwritten, and `name` is then always written into this scope too.
    pub fn declare_or_assign(&self, name: &str, value: Value) {
        let mut ancestor = self.parent.as_deref();
        while let Some(env) = ancestor {
            if env.is_root() {
                break;
            }
            if env.has_local(name) {
                env.define(name, Binding::Value(value.clone()));
            }
            ancestor = env.parent.as_deref();
        }

        self.define(name, Binding::Value(value));
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.scope.borrow().contains_key(name)
    }

    pub fn get_local(&self, name: &str) -> Option<Binding> {
        self.scope.borrow().get(name).cloned()
    }

    /// Innermost binding of `name`, searching outward.
    pub fn get(&self, name: &str) -> Option<Binding> {
        if let Some(binding) = self.get_local(name) {
            return Some(binding);
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    pub fn lookup(&self, token: &Token) -> Result<Binding, Error> {
        self.get(&token.text)
            .ok_or_else(|| Error::undefined_name(token.text.clone(), token.span()))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn number(env: &Environment, name: &str) -> Option<f64> {
        match env.get(name) {
            Some(Binding::Value(value)) => value.as_number(),
            _ => None,
        }
    }

    fn local_number(env: &Environment, name: &str) -> Option<f64> {
        match env.get_local(name) {
            Some(Binding::Value(value)) => value.as_number(),
            _ => None,
        }
    }

    #[test]
    fn test_lookup_walks_outward() {
        let root = Environment::new();
        root.define("x", Binding::Value(Value::Number(1.0)));
        let inner = root.child().child();
        assert_eq!(number(&inner, "x"), Some(1.0));
    }

    #[test]
    fn test_innermost_binding_wins() {
        let root = Environment::new();
        root.define("x", Binding::Value(Value::Number(1.0)));
        let child = root.child();
        child.define("x", Binding::Value(Value::Number(2.0)));
        assert_eq!(number(&child, "x"), Some(2.0));
        assert_eq!(number(&root, "x"), Some(1.0));
    }

    #[test]
    fn test_assignment_writes_ancestor_and_origin() {
        let e0 = Environment::new();
        let e1 = e0.child();
        let e2 = e1.child();
        e1.define("x", Binding::Value(Value::Number(1.0)));

        e2.declare_or_assign("x", Value::Number(5.0));

        assert_eq!(local_number(&e1, "x"), Some(5.0));
        assert_eq!(local_number(&e2, "x"), Some(5.0));
        assert!(!e0.has_local("x"));
    }

    #[test]
    fn test_assignment_never_writes_root_from_below() {
        let root = Environment::new();
        root.define("x", Binding::Value(Value::Number(1.0)));
        let child = root.child();

        child.declare_or_assign("x", Value::Number(2.0));

        assert_eq!(local_number(&root, "x"), Some(1.0));
        assert_eq!(local_number(&child, "x"), Some(2.0));
    }

    #[test]
    fn test_assignment_at_root_defines_there() {
        let root = Environment::new();
        root.declare_or_assign("x", Value::Number(3.0));
        assert_eq!(local_number(&root, "x"), Some(3.0));
    }

    #[test]
    fn test_assignment_skips_ancestors_without_binding() {
        let e0 = Environment::new();
        let e1 = e0.child();
        let e2 = e1.child();
        e2.declare_or_assign("y", Value::Number(1.0));
        assert!(!e1.has_local("y"));
        assert!(e2.has_local("y"));
    }

    #[test]
    fn test_unresolved_name() {
        let env = Environment::new();
        let token = Token::new("missing", TokenKind::Identifier, 12);
        let error = env.lookup(&token).unwrap_err();
        assert_eq!(error, Error::undefined_name("missing", crate::diagnostic::Span::new(5, 12)));
    }
}
