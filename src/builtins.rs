use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rand::Rng;
use substring::Substring;

use crate::environment::Environment;
use crate::error::{ErrorKind, SourceError};
use crate::flow::{EvalResult, Flow};
use crate::function::{Arity, BuiltinFunction};
use crate::interpreter::Interpreter;
use crate::object::Value;
use crate::token::Location;

/// Populates the global environment with the full built-in surface. Called
/// once per `Interpreter::new` — the registry itself is treated as
/// read-only for the rest of the program's life.
pub fn register(globals: &Rc<RefCell<Environment>>) {
    let entries: &[(&str, Arity, fn(&mut Interpreter, &[Value], Location) -> EvalResult)] = &[
        ("len", Arity::Exact(1), len),
        ("type", Arity::Exact(1), type_of),
        ("str", Arity::Exact(1), to_str),
        ("int", Arity::Exact(1), to_int),
        ("bool", Arity::Exact(1), to_bool),
        ("first", Arity::Exact(1), first),
        ("last", Arity::Exact(1), last),
        ("rest", Arity::Exact(1), rest),
        ("push", Arity::Exact(2), push),
        ("pop", Arity::Exact(1), pop),
        ("slice", Arity::Range(2, 3), slice),
        ("concat", Arity::Exact(2), concat),
        ("reverse", Arity::Exact(1), reverse),
        ("join", Arity::Range(1, 2), join),
        ("map", Arity::Exact(2), map),
        ("filter", Arity::Exact(2), filter),
        ("reduce", Arity::Exact(3), reduce),
        ("forEach", Arity::Exact(2), for_each),
        ("split", Arity::Exact(2), split),
        ("replace", Arity::Exact(3), replace),
        ("trim", Arity::Exact(1), trim),
        ("upper", Arity::Exact(1), upper),
        ("lower", Arity::Exact(1), lower),
        ("substr", Arity::Range(2, 3), substr),
        ("indexOf", Arity::Exact(2), index_of),
        ("contains", Arity::Exact(2), contains),
        ("charAt", Arity::Exact(2), char_at),
        ("abs", Arity::Exact(1), abs),
        ("max", Arity::AtLeast(1), max),
        ("min", Arity::AtLeast(1), min),
        ("round", Arity::Exact(1), round),
        ("floor", Arity::Exact(1), floor),
        ("ceil", Arity::Exact(1), ceil),
        ("pow", Arity::Exact(2), pow),
        ("sqrt", Arity::Exact(1), sqrt),
        ("random", Arity::Range(0, 1), random),
        ("print", Arity::AtLeast(0), print),
        ("println", Arity::AtLeast(0), println),
        ("range", Arity::Range(1, 3), range),
        ("keys", Arity::Exact(1), keys),
        ("values", Arity::Exact(1), values),
        ("error", Arity::Exact(1), make_error),
        ("assert", Arity::Range(1, 2), assert),
    ];

    for (name, arity, func) in entries {
        let builtin = Value::BuiltinFunction(Rc::new(BuiltinFunction {
            name: name.to_string(),
            arity: *arity,
            func: *func,
        }));
        globals.borrow_mut().define(name, builtin).expect("builtin names are registered exactly once");
    }
}

fn err(kind: ErrorKind, message: impl Into<String>, location: Location) -> Flow {
    Flow::Error(SourceError::new(kind, message).with_location(location))
}

fn type_error(fn_name: &str, value: &Value, location: Location) -> Flow {
    err(ErrorKind::TypeMismatch, format!("'{fn_name}' does not accept {}", value.type_str()), location)
}

// ---- core ------------------------------------------------------------

fn len(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    match &args[0] {
        Value::Str(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Integer(items.borrow().len() as i64)),
        Value::Hash(pairs) => Ok(Value::Integer(pairs.borrow().len() as i64)),
        other => Err(type_error("len", other, location)),
    }
}

fn type_of(_: &mut Interpreter, args: &[Value], _location: Location) -> EvalResult {
    Ok(Value::str(args[0].type_str()))
}

fn to_str(_: &mut Interpreter, args: &[Value], _location: Location) -> EvalResult {
    Ok(Value::str(args[0].to_string()))
}

fn to_int(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => Ok(Value::Integer(*n as i64)),
        Value::Str(s) => s.trim().parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| err(ErrorKind::TypeMismatch, format!("cannot parse '{s}' as an integer"), location)),
        Value::Boolean(b) => Ok(Value::Integer(if *b { 1 } else { 0 })),
        other => Err(type_error("int", other, location)),
    }
}

fn to_bool(_: &mut Interpreter, args: &[Value], _location: Location) -> EvalResult {
    Ok(Value::Boolean(args[0].is_truthy()))
}

// ---- array -------------------------------------------------------------

fn as_array(value: &Value, fn_name: &str, location: Location) -> Result<Rc<RefCell<Vec<Value>>>, Flow> {
    match value {
        Value::Array(items) => Ok(Rc::clone(items)),
        other => Err(type_error(fn_name, other, location)),
    }
}

fn first(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "first", location)?;
    Ok(items.borrow().first().cloned().unwrap_or(Value::Null))
}

fn last(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "last", location)?;
    Ok(items.borrow().last().cloned().unwrap_or(Value::Null))
}

fn rest(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "rest", location)?;
    let items = items.borrow();
    Ok(Value::array(items.iter().skip(1).cloned().collect()))
}

fn push(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "push", location)?;
    let mut copy = items.borrow().clone();
    copy.push(args[1].clone());
    Ok(Value::array(copy))
}

fn pop(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "pop", location)?;
    let mut copy = items.borrow().clone();
    copy.pop();
    Ok(Value::array(copy))
}

fn normalize_bound(index: i64, len: usize) -> usize {
    let normalized = if index < 0 { index + len as i64 } else { index };
    normalized.clamp(0, len as i64) as usize
}

fn slice(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "slice", location)?;
    let items = items.borrow();
    let len = items.len();

    let start = match &args[1] {
        Value::Integer(n) => normalize_bound(*n, len),
        other => return Err(type_error("slice", other, location)),
    };
    let end = match args.get(2) {
        Some(Value::Integer(n)) => normalize_bound(*n, len),
        Some(other) => return Err(type_error("slice", other, location)),
        None => len,
    };

    if start >= end {
        return Ok(Value::array(Vec::new()));
    }
    Ok(Value::array(items[start..end].to_vec()))
}

fn concat(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let a = as_array(&args[0], "concat", location)?;
    let b = as_array(&args[1], "concat", location)?;
    let mut out = a.borrow().clone();
    out.extend(b.borrow().iter().cloned());
    Ok(Value::array(out))
}

fn reverse(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "reverse", location)?;
    let mut copy = items.borrow().clone();
    copy.reverse();
    Ok(Value::array(copy))
}

fn join(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "join", location)?;
    let sep = match args.get(1) {
        Some(Value::Str(s)) => s.to_string(),
        Some(other) => return Err(type_error("join", other, location)),
        None => ",".to_string(),
    };
    let rendered: Vec<String> = items.borrow().iter().map(|v| v.to_string()).collect();
    Ok(Value::str(rendered.join(&sep)))
}

fn map(interpreter: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "map", location)?;
    let callback = args[1].clone();
    let snapshot = items.borrow().clone();
    let mut out = Vec::with_capacity(snapshot.len());
    for item in snapshot {
        out.push(interpreter.call_value(callback.clone(), vec![item], location)?);
    }
    Ok(Value::array(out))
}

fn filter(interpreter: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "filter", location)?;
    let callback = args[1].clone();
    let snapshot = items.borrow().clone();
    let mut out = Vec::new();
    for item in snapshot {
        let keep = interpreter.call_value(callback.clone(), vec![item.clone()], location)?;
        if keep.is_truthy() {
            out.push(item);
        }
    }
    Ok(Value::array(out))
}

fn reduce(interpreter: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "reduce", location)?;
    let callback = args[1].clone();
    let mut accumulator = args[2].clone();
    let snapshot = items.borrow().clone();
    for item in snapshot {
        accumulator = interpreter.call_value(callback.clone(), vec![accumulator, item], location)?;
    }
    Ok(accumulator)
}

fn for_each(interpreter: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let items = as_array(&args[0], "forEach", location)?;
    let callback = args[1].clone();
    let snapshot = items.borrow().clone();
    for item in snapshot {
        interpreter.call_value(callback.clone(), vec![item], location)?;
    }
    Ok(Value::Null)
}

// ---- string ------------------------------------------------------------

fn as_str<'a>(value: &'a Value, fn_name: &str, location: Location) -> Result<&'a Rc<str>, Flow> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(type_error(fn_name, other, location)),
    }
}

fn split(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "split", location)?;
    let delim = as_str(&args[1], "split", location)?;
    let parts: Vec<Value> = if delim.is_empty() {
        s.chars().map(|c| Value::str(c.to_string())).collect()
    } else {
        s.split(delim.as_ref()).map(Value::str).collect()
    };
    Ok(Value::array(parts))
}

fn replace(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "replace", location)?;
    let from = as_str(&args[1], "replace", location)?;
    let to = as_str(&args[2], "replace", location)?;
    Ok(Value::str(s.replace(from.as_ref(), to)))
}

fn trim(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "trim", location)?;
    Ok(Value::str(s.trim().to_string()))
}

fn upper(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "upper", location)?;
    Ok(Value::str(s.to_uppercase()))
}

fn lower(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "lower", location)?;
    Ok(Value::str(s.to_lowercase()))
}

fn substr(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "substr", location)?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    let start = match &args[1] {
        Value::Integer(n) => normalize_bound(*n, len),
        other => return Err(type_error("substr", other, location)),
    };
    let end = match args.get(2) {
        Some(Value::Integer(n)) => start.saturating_add((*n).max(0) as usize).min(len),
        Some(other) => return Err(type_error("substr", other, location)),
        None => len,
    };

    if start >= end {
        return Ok(Value::str(""));
    }
    Ok(Value::str(s.substring(start, end).to_string()))
}

fn index_of(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "indexOf", location)?;
    let needle = as_str(&args[1], "indexOf", location)?;
    match s.find(needle.as_ref()) {
        Some(byte_idx) => Ok(Value::Integer(s[..byte_idx].chars().count() as i64)),
        None => Ok(Value::Integer(-1)),
    }
}

fn contains(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "contains", location)?;
    let needle = as_str(&args[1], "contains", location)?;
    Ok(Value::Boolean(s.contains(needle.as_ref())))
}

fn char_at(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let s = as_str(&args[0], "charAt", location)?;
    let index = match &args[1] {
        Value::Integer(n) => *n,
        other => return Err(type_error("charAt", other, location)),
    };
    let chars: Vec<char> = s.chars().collect();
    match in_bounds(index, chars.len()) {
        Some(idx) => Ok(Value::str(chars[idx].to_string())),
        None => Err(err(ErrorKind::Runtime, format!("index {index} out of bounds for string of length {}", chars.len()), location)),
    }
}

fn in_bounds(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        return None;
    }
    let index = index as usize;
    if index < len { Some(index) } else { None }
}

// ---- math ----------------------------------------------------------------

fn abs(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.abs())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        other => Err(type_error("abs", other, location)),
    }
}

fn as_number(value: &Value, fn_name: &str, location: Location) -> Result<f64, Flow> {
    match value {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        other => Err(type_error(fn_name, other, location)),
    }
}

fn max(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    extremum(args, location, "max", |a, b| a > b)
}

fn min(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    extremum(args, location, "min", |a, b| a < b)
}

fn extremum(args: &[Value], location: Location, fn_name: &str, better: fn(f64, f64) -> bool) -> EvalResult {
    let mut best = args[0].clone();
    let mut best_val = as_number(&best, fn_name, location)?;
    for candidate in &args[1..] {
        let value = as_number(candidate, fn_name, location)?;
        if better(value, best_val) {
            best_val = value;
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn round(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let n = as_number(&args[0], "round", location)?;
    Ok(Value::Integer(n.round() as i64))
}

fn floor(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let n = as_number(&args[0], "floor", location)?;
    Ok(Value::Integer(n.floor() as i64))
}

fn ceil(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let n = as_number(&args[0], "ceil", location)?;
    Ok(Value::Integer(n.ceil() as i64))
}

fn pow(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let exponent = match &args[1] {
        Value::Integer(n) if *n >= 0 => *n as u32,
        _ => return Err(err(ErrorKind::TypeMismatch, "'pow' requires a non-negative integer exponent", location)),
    };
    match &args[0] {
        Value::Integer(base) => Ok(Value::Integer(base.wrapping_pow(exponent))),
        Value::Float(base) => Ok(Value::Float(base.powi(exponent as i32))),
        other => Err(type_error("pow", other, location)),
    }
}

fn sqrt(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let n = as_number(&args[0], "sqrt", location)?;
    if n < 0.0 {
        return Err(err(ErrorKind::Runtime, "'sqrt' requires a non-negative argument", location));
    }
    Ok(Value::Float(n.sqrt()))
}

fn random(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let mut rng = rand::thread_rng();
    match args.first() {
        None => Ok(Value::Integer(rng.gen_range(0..2))),
        Some(Value::Integer(max)) if *max > 0 => Ok(Value::Integer(rng.gen_range(0..*max))),
        Some(Value::Integer(_)) => Err(err(ErrorKind::Runtime, "'random' requires a positive upper bound", location)),
        Some(other) => Err(type_error("random", other, location)),
    }
}

// ---- io --------------------------------------------------------------

fn print(_: &mut Interpreter, args: &[Value], _location: Location) -> EvalResult {
    let rendered: Vec<String> = args.iter().map(Value::inspect).collect();
    print!("{}", rendered.join(" "));
    Ok(Value::Null)
}

fn println(_: &mut Interpreter, args: &[Value], _location: Location) -> EvalResult {
    let rendered: Vec<String> = args.iter().map(Value::inspect).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Null)
}

// ---- utility -----------------------------------------------------------

fn range(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let as_int = |v: &Value| match v {
        Value::Integer(n) => Ok(*n),
        other => Err(type_error("range", other, location)),
    };

    let (start, end) = match args.len() {
        1 => (0, as_int(&args[0])?),
        _ => (as_int(&args[0])?, as_int(&args[1])?),
    };
    let step = match args.get(2) {
        Some(v) => as_int(v)?,
        None => 1,
    };

    if step == 0 {
        return Err(err(ErrorKind::Runtime, "'range' step must not be zero", location));
    }

    let mut out = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < end {
            out.push(Value::Integer(i));
            i += step;
        }
    } else {
        while i > end {
            out.push(Value::Integer(i));
            i += step;
        }
    }
    Ok(Value::array(out))
}

// ---- hash --------------------------------------------------------------

fn as_hash(value: &Value, fn_name: &str, location: Location) -> Result<Rc<RefCell<IndexMap<String, Value>>>, Flow> {
    match value {
        Value::Hash(pairs) => Ok(Rc::clone(pairs)),
        other => Err(type_error(fn_name, other, location)),
    }
}

fn keys(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let pairs = as_hash(&args[0], "keys", location)?;
    Ok(Value::array(pairs.borrow().keys().map(|k| Value::str(k.clone())).collect()))
}

fn values(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let pairs = as_hash(&args[0], "values", location)?;
    Ok(Value::array(pairs.borrow().values().cloned().collect()))
}

// ---- errors --------------------------------------------------------------

fn make_error(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    let message = args[0].to_string();
    Ok(Value::Error(Rc::new(SourceError::new(ErrorKind::Runtime, message).with_location(location))))
}

fn assert(_: &mut Interpreter, args: &[Value], location: Location) -> EvalResult {
    if args[0].is_truthy() {
        return Ok(Value::Null);
    }
    let message = match args.get(1) {
        Some(v) => v.to_string(),
        None => "assertion failed".to_string(),
    };
    Ok(Value::Error(Rc::new(SourceError::new(ErrorKind::Runtime, message).with_location(location))))
}
