use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{ErrorKind, SourceError};
use crate::object::Value;
use crate::token::Token;

/// Distinguishes a loop/block scope from a function-call scope. Both follow
/// identical resolution rules; the kind only flavors diagnostics (and lets
/// the interpreter tell, without walking up, whether it has crossed a call
/// boundary when absorbing `Return`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Block,
    Function,
}

/// A single lexical scope. Scopes form a parent-pointer tree via `enclosing`;
/// `Rc<RefCell<_>>` lets closures capture a scope by reference and outlive
/// the block that created it.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub kind: ScopeKind,
    variables: HashMap<String, Value>,
    immutable: HashSet<String>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            enclosing: None,
            kind: ScopeKind::Global,
            variables: HashMap::new(),
            immutable: HashSet::new(),
        }))
    }

    pub fn child_block(parent: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            enclosing: Some(Rc::clone(parent)),
            kind: ScopeKind::Block,
            variables: HashMap::new(),
            immutable: HashSet::new(),
        }))
    }

    pub fn child_function(parent: &Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            enclosing: Some(Rc::clone(parent)),
            kind: ScopeKind::Function,
            variables: HashMap::new(),
            immutable: HashSet::new(),
        }))
    }

    /// Creates a binding in this scope. Fails if `name` is already bound
    /// here (shadowing an outer scope is fine; redeclaring in the same one
    /// is not).
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), SourceError> {
        if self.variables.contains_key(name) {
            return Err(SourceError::new(
                ErrorKind::Runtime,
                format!("'{name}' already declared in this scope"),
            ));
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    pub fn define_const(&mut self, name: &str, value: Value) -> Result<(), SourceError> {
        self.define(name, value)?;
        self.immutable.insert(name.to_string());
        Ok(())
    }

    /// Walks up from this scope; first binding found wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.variables.get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|parent| parent.borrow().get(name))
    }

    /// Climbs from `env` looking for the declaring scope of `name`, then
    /// overwrites the binding there — unless that scope recorded the name
    /// as immutable, in which case this is an `AssignmentError`.
    pub fn assign(env: &Rc<RefCell<Environment>>, name: &Token, value: Value) -> Result<(), SourceError> {
        let mut scope = Rc::clone(env);
        loop {
            let has_binding = scope.borrow().variables.contains_key(&name.lexeme);
            if has_binding {
                if scope.borrow().immutable.contains(&name.lexeme) {
                    return Err(SourceError::new(
                        ErrorKind::Assignment,
                        format!("cannot assign to constant {}", name.lexeme),
                    ).with_location(name.location));
                }
                scope.borrow_mut().variables.insert(name.lexeme.clone(), value);
                return Ok(());
            }

            let parent = scope.borrow().enclosing.clone();
            match parent {
                Some(next) => scope = next,
                None => {
                    return Err(SourceError::new(
                        ErrorKind::Runtime,
                        format!("identifier not found: {}", name.lexeme),
                    ).with_location(name.location));
                }
            }
        }
    }

    /// Same resolution rule as `get`, surfaced as a `SourceError` for use
    /// sites that need the `identifier not found` diagnostic directly.
    pub fn resolve(env: &Rc<RefCell<Environment>>, name: &Token) -> Result<Value, SourceError> {
        env.borrow().get(&name.lexeme).ok_or_else(|| {
            SourceError::new(ErrorKind::Runtime, format!("identifier not found: {}", name.lexeme))
                .with_location(name.location)
        })
    }
}
