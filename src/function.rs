use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::flow::EvalResult;
use crate::interpreter::Interpreter;
use crate::object::Value;
use crate::stmt::Stmt;
use crate::token::{Location, Token};

/// A user-defined function/method literal: its parameter list, body, and
/// the environment it closed over at the point it was created. `Rc<Vec<Stmt>>`
/// lets every call share the same parsed body instead of cloning it.
#[derive(Debug)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(name: Option<String>, params: Vec<Token>, body: Vec<Stmt>, closure: Rc<RefCell<Environment>>) -> Self {
        Function { name, params, body: Rc::new(body), closure }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.as_deref().unwrap_or("anonymous"))
    }
}

/// How many arguments a builtin accepts. Most built-ins are fixed-arity;
/// a handful (`print`, `max`, `min`, `range`) are variadic or accept an
/// optional trailing argument, so arity is checked by the builtin body
/// itself rather than the dispatcher for those.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            Arity::Exact(k) => n == *k,
            Arity::Range(lo, hi) => n >= *lo && n <= *hi,
            Arity::AtLeast(lo) => n >= *lo,
        }
    }
}

/// A built-in function: a name (for error messages and `type`/`str`
/// rendering), its accepted arity, and the host implementation.
pub struct BuiltinFunction {
    pub name: String,
    pub arity: Arity,
    pub func: fn(&mut Interpreter, &[Value], Location) -> EvalResult,
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

impl Display for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}
