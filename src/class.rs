use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::flow::EvalResult;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::Value;
use crate::token::Location;

/// A method is either user-defined (a closure over the class's defining
/// scope) or a host-provided builtin bound to a fixed arity. No concrete
/// builtin methods ship on `Object` today, but the shape is load-bearing:
/// the data model names `BuiltinMethod` as a first-class member of `Method`.
#[derive(Clone)]
pub enum Method {
    User(Rc<Function>),
    Builtin(Rc<BuiltinMethod>),
}

impl Method {
    pub fn arity(&self) -> usize {
        match self {
            Method::User(f) => f.params.len(),
            Method::Builtin(b) => b.arity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Method::User(f) => f.name.as_deref().unwrap_or("method"),
            Method::Builtin(b) => &b.name,
        }
    }
}

pub struct BuiltinMethod {
    pub name: String,
    pub arity: usize,
    pub func: fn(&mut Interpreter, Rc<Instance>, &[Value], Location) -> EvalResult,
}

/// A class is immutable once built: no language construct ever adds a
/// method to an existing class, so unlike `Instance` there is no `RefCell`
/// here — a bare `Rc<Class>` is enough for shared ownership.
pub struct Class {
    pub name: String,
    pub parent: Option<Rc<Class>>,
    pub constructor: Option<Rc<Function>>,
    pub methods: HashMap<String, Method>,
}

impl Class {
    pub fn new(name: String, parent: Option<Rc<Class>>, constructor: Option<Rc<Function>>, methods: HashMap<String, Method>) -> Self {
        Class { name, parent, constructor, methods }
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// Walks the parent chain looking for `name`, returning both the resolved
/// method and the class that actually owns it (not necessarily `class`
/// itself). The owner is what makes `super` resolution correct when a
/// method is inherited unchanged through several levels.
pub fn find_method_with_owner(class: &Rc<Class>, name: &str) -> Option<(Rc<Class>, Method)> {
    if let Some(method) = class.methods.get(name) {
        return Some((Rc::clone(class), method.clone()));
    }
    match &class.parent {
        Some(parent) => find_method_with_owner(parent, name),
        None => None,
    }
}

/// Walks the parent chain for the nearest constructor, along with the class
/// that owns it. Lets a subclass with no `constructor` of its own still be
/// instantiated through its nearest ancestor's constructor.
pub fn find_constructor(class: &Rc<Class>) -> Option<(Rc<Class>, Rc<Function>)> {
    if let Some(ctor) = &class.constructor {
        return Some((Rc::clone(class), Rc::clone(ctor)));
    }
    class.parent.as_ref().and_then(find_constructor)
}

/// Defensive cycle check at class-definition time: true inheritance cycles
/// cannot arise from a single forward pass over `class ... extends ...`
/// declarations (a parent must already exist to be named), but the
/// invariant that classes form a tree is checked directly rather than
/// assumed.
pub fn chain_contains(class: &Rc<Class>, name: &str) -> bool {
    if class.name == name {
        return true;
    }
    match &class.parent {
        Some(parent) => chain_contains(parent, name),
        None => false,
    }
}

/// A live object: a class pointer (fixed for the instance's lifetime) plus
/// mutable property storage. The `RefCell` is scoped to just the mutable
/// field rather than the whole struct, so `class` can be read without
/// borrowing `properties`.
pub struct Instance {
    pub class: Rc<Class>,
    pub properties: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Instance { class, properties: RefCell::new(HashMap::new()) }
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.name)
    }
}

/// A method resolved against a specific receiver, ready to be invoked as a
/// value in its own right (e.g. stored, passed around, or the product of
/// `instance.method` without a trailing call).
pub struct BoundMethod {
    pub receiver: Rc<Instance>,
    pub method: Method,
    pub name: String,
    pub owner: Rc<Class>,
}

impl Display for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<bound method {}>", self.name)
    }
}
