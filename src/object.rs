use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::class::{BoundMethod, Class};
use crate::error::SourceError;
use crate::function::{BuiltinFunction, Function};

/// The runtime value union. Array/Hash/Instance carry shared mutable
/// identity (`Rc<RefCell<_>>`); Class is immutable after construction (no
/// language feature ever adds a method post-definition), so it is a bare
/// `Rc<Class>` rather than `Rc<RefCell<Class>>`.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<IndexMap<String, Value>>>),
    Function(Rc<Function>),
    BuiltinFunction(Rc<BuiltinFunction>),
    Class(Rc<Class>),
    Instance(Rc<crate::class::Instance>),
    BoundMethod(Rc<BoundMethod>),
    Error(Rc<SourceError>),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn hash(pairs: IndexMap<String, Value>) -> Value {
        Value::Hash(Rc::new(RefCell::new(pairs)))
    }

    /// The name surfaced by the built-in `type()` function.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::BuiltinFunction(_) => "FUNCTION",
            Value::Class(_) => "CLASS",
            Value::Instance(_) => "INSTANCE",
            Value::BoundMethod(_) => "FUNCTION",
            Value::Error(_) => "ERROR",
        }
    }

    /// Truthiness per the data model: `false`, `null`, zero/NaN/infinite
    /// numerics, empty string/array/hash, and `Error` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Null => false,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && n.is_finite(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.borrow().is_empty(),
            Value::Hash(h) => !h.borrow().is_empty(),
            Value::Error(_) => false,
            Value::Function(_)
            | Value::BuiltinFunction(_)
            | Value::Class(_)
            | Value::Instance(_)
            | Value::BoundMethod(_) => true,
        }
    }

    /// Default equality when no `__eq__`/`__ne__` dunder resolves: value
    /// equality for primitives, identity for everything with shared
    /// mutable state or behavior.
    pub fn values_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => *a as f64 == *b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::BuiltinFunction(a), Value::BuiltinFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The `inspect()`-style rendering used by `print`/`println` and by
    /// values nested inside arrays/hashes (strings get quoted there).
    pub fn inspect(&self) -> String {
        match self {
            Value::Str(s) => format!("{s:?}"),
            Value::Array(items) => {
                let rendered: Vec<String> = items.borrow().iter().map(Value::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs.borrow().iter()
                    .map(|(k, v)| format!("{k:?}: {}", v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            other => format!("{other}"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                let rendered: Vec<String> = items.borrow().iter().map(Value::inspect).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs.borrow().iter()
                    .map(|(k, v)| format!("{k:?}: {}", v.inspect()))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Value::Function(func) => write!(f, "<fn {}>", func.name.as_deref().unwrap_or("anonymous")),
            Value::BuiltinFunction(func) => write!(f, "<builtin {}>", func.name),
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Instance(instance) => write!(f, "<instance {}>", instance.class.name),
            Value::BoundMethod(bound) => write!(f, "<bound method {}>", bound.name),
            Value::Error(err) => write!(f, "{}", err.report()),
        }
    }
}
