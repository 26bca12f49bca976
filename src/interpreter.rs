use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use log::trace;

use crate::class::{chain_contains, find_constructor, find_method_with_owner, BoundMethod, Class, Instance, Method};
use crate::environment::Environment;
use crate::error::{ErrorKind, SourceError};
use crate::expr::*;
use crate::flow::{EvalResult, Flow};
use crate::function::{Arity, Function};
use crate::object::Value;
use crate::stmt::*;
use crate::token::{Location, Token, Type};
use crate::builtins;

type Env = Rc<RefCell<Environment>>;

fn err(kind: ErrorKind, message: impl Into<String>, location: Location) -> Flow {
    Flow::Error(SourceError::new(kind, message).with_location(location))
}

/// The tree-walking evaluator. Holds only the global scope; every nested
/// scope (block, function call, loop iteration) is a child `Environment`
/// threaded through as a plain argument rather than interpreter state, so
/// recursive and re-entrant evaluation never fight over "the current scope".
pub struct Interpreter {
    pub globals: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new_global();
        builtins::register(&globals);
        Interpreter { globals }
    }

    /// Runs a parsed program to completion and returns its result: the value
    /// of the last statement executed, the unwrapped payload of a `return`
    /// that escaped the top level, or the `Error` value of whatever fault
    /// ended evaluation early.
    pub fn interpret(&mut self, program: &Program) -> Value {
        let globals = Rc::clone(&self.globals);
        match self.execute_block(program, &globals) {
            Ok(value) => value,
            Err(Flow::Error(error)) => Value::Error(Rc::new(error)),
            Err(Flow::Return(value)) => value,
            Err(Flow::Break) | Err(Flow::Continue) => {
                Value::Error(Rc::new(SourceError::new(ErrorKind::Runtime, "break/continue outside of a loop")))
            }
        }
    }

    // ---- statements ----------------------------------------------------

    fn execute_block(&mut self, statements: &[Stmt], env: &Env) -> EvalResult {
        let mut result = Value::Null;
        for statement in statements {
            result = self.execute(statement, env)?;
        }
        Ok(result)
    }

    fn execute(&mut self, stmt: &Stmt, env: &Env) -> EvalResult {
        match stmt {
            Stmt::Let(d) => {
                let value = self.evaluate(&d.value, env)?;
                env.borrow_mut().define(&d.name.lexeme, value)
                    .map_err(|e| Flow::Error(e.with_location(d.name.location)))?;
                Ok(Value::Null)
            }
            Stmt::Const(d) => {
                let value = self.evaluate(&d.value, env)?;
                env.borrow_mut().define_const(&d.name.lexeme, value)
                    .map_err(|e| Flow::Error(e.with_location(d.name.location)))?;
                Ok(Value::Null)
            }
            Stmt::Return(d) => {
                let value = match &d.value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Null,
                };
                Err(Flow::Return(value))
            }
            Stmt::While(d) => self.execute_while(d, env),
            Stmt::For(d) => self.execute_for(d, env),
            Stmt::Break(_) => Err(Flow::Break),
            Stmt::Continue(_) => Err(Flow::Continue),
            Stmt::Block(d) => {
                let child = Environment::child_block(env);
                self.execute_block(&d.statements, &child)
            }
            Stmt::Expression(d) => self.evaluate(&d.expr, env),
            Stmt::Class(d) => self.execute_class(d, env),
        }
    }

    fn execute_while(&mut self, data: &WhileData, env: &Env) -> EvalResult {
        loop {
            let condition = self.evaluate(&data.condition, env)?;
            if !condition.is_truthy() {
                return Ok(Value::Null);
            }

            let body_env = Environment::child_block(env);
            match self.execute_block(&data.body, &body_env) {
                Ok(_) => {}
                Err(Flow::Break) => return Ok(Value::Null),
                Err(Flow::Continue) => continue,
                Err(other) => return Err(other),
            }
        }
    }

    fn execute_for(&mut self, data: &ForData, env: &Env) -> EvalResult {
        let loop_env = Environment::child_block(env);
        self.execute(&data.init, &loop_env)?;

        loop {
            let condition = self.evaluate(&data.condition, &loop_env)?;
            if !condition.is_truthy() {
                return Ok(Value::Null);
            }

            let body_env = Environment::child_block(&loop_env);
            match self.execute_block(&data.body, &body_env) {
                Ok(_) => {}
                Err(Flow::Break) => return Ok(Value::Null),
                Err(Flow::Continue) => {}
                Err(other) => return Err(other),
            }

            self.evaluate(&data.update, &loop_env)?;
        }
    }

    fn execute_class(&mut self, data: &ClassData, env: &Env) -> EvalResult {
        let parent = match &data.parent {
            Some(name) => {
                match Environment::resolve(env, name) {
                    Ok(Value::Class(class)) => Some(class),
                    Ok(_) => return Err(err(ErrorKind::Class, format!("'{}' is not a class", name.lexeme), name.location)),
                    Err(_) => return Err(err(ErrorKind::Class, format!("superclass not found: {}", name.lexeme), name.location)),
                }
            }
            None => None,
        };

        if let Some(parent) = &parent {
            if chain_contains(parent, &data.name.lexeme) {
                return Err(err(ErrorKind::Class, format!("circular inheritance involving '{}'", data.name.lexeme), data.token.location));
            }
        }

        trace!("defining class {} (parent: {:?})", data.name.lexeme, parent.as_ref().map(|p| &p.name));

        let constructor = data.constructor.as_ref().map(|m| {
            Rc::new(Function::new(Some(m.name.lexeme.clone()), m.params.clone(), m.body.clone(), Rc::clone(env)))
        });

        let mut methods = HashMap::new();
        for m in &data.methods {
            let function = Rc::new(Function::new(Some(m.name.lexeme.clone()), m.params.clone(), m.body.clone(), Rc::clone(env)));
            methods.insert(m.name.lexeme.clone(), Method::User(function));
        }

        let class = Rc::new(Class::new(data.name.lexeme.clone(), parent, constructor, methods));
        env.borrow_mut().define(&data.name.lexeme, Value::Class(class))
            .map_err(|e| Flow::Error(e.with_location(data.name.location)))?;
        Ok(Value::Null)
    }

    // ---- expressions -----------------------------------------------------

    fn evaluate(&mut self, expr: &Expr, env: &Env) -> EvalResult {
        match expr {
            Expr::Integer(d) => Ok(Value::Integer(d.value)),
            Expr::Float(d) => Ok(Value::Float(d.value)),
            Expr::Str(d) => Ok(Value::str(d.value.clone())),
            Expr::Boolean(d) => Ok(Value::Boolean(d.value)),
            Expr::Null(_) => Ok(Value::Null),
            Expr::Identifier(d) => Environment::resolve(env, &d.token).map_err(Flow::Error),
            Expr::Array(d) => {
                let mut items = Vec::with_capacity(d.elements.len());
                for element in &d.elements {
                    items.push(self.evaluate(element, env)?);
                }
                Ok(Value::array(items))
            }
            Expr::Hash(d) => self.evaluate_hash(d, env),
            Expr::Function(d) => Ok(Value::Function(Rc::new(Function::new(
                d.name.clone(), d.params.clone(), d.body.clone(), Rc::clone(env),
            )))),
            Expr::Prefix(d) => self.evaluate_prefix(d, env),
            Expr::Infix(d) => self.evaluate_infix(d, env),
            Expr::If(d) => self.evaluate_if(d, env),
            Expr::Call(d) => self.evaluate_call(d, env),
            Expr::Index(d) => self.evaluate_index(d, env),
            Expr::Property(d) => self.evaluate_property(d, env),
            Expr::Assignment(d) => self.evaluate_assignment(d, env),
            Expr::New(d) => self.evaluate_new(d, env),
            Expr::This(d) => self.lookup_this(env, d.token.location),
            Expr::Super(d) => self.evaluate_super(d, env),
        }
    }

    fn evaluate_hash(&mut self, data: &HashData, env: &Env) -> EvalResult {
        let mut pairs = IndexMap::new();
        for (key_expr, value_expr) in &data.pairs {
            let key = match key_expr {
                Expr::Str(s) => s.value.clone(),
                Expr::Integer(i) => i.value.to_string(),
                _ => unreachable!("parser guarantees hash keys are string or integer literals"),
            };
            let value = self.evaluate(value_expr, env)?;
            pairs.insert(key, value);
        }
        Ok(Value::hash(pairs))
    }

    fn evaluate_prefix(&mut self, data: &PrefixData, env: &Env) -> EvalResult {
        let right = self.evaluate(&data.right, env)?;
        match data.operator.r#type {
            Type::Minus => match right {
                Value::Integer(n) => Ok(Value::Integer(-n)),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(err(ErrorKind::TypeMismatch, format!("'-' is not supported for {}", other.type_str()), data.token.location)),
            },
            Type::Bang => Ok(Value::Boolean(!right.is_truthy())),
            _ => unreachable!("parser only produces '-' and '!' prefix operators"),
        }
    }

    fn evaluate_infix(&mut self, data: &InfixData, env: &Env) -> EvalResult {
        if matches!(data.operator.r#type, Type::And | Type::Or) {
            return self.evaluate_logical(data, env);
        }

        let left = self.evaluate(&data.left, env)?;
        let right = self.evaluate(&data.right, env)?;
        self.apply_operator(&data.operator, left, right)
    }

    /// `&&`/`||` short-circuit for ordinary values (the left operand decides
    /// whether the right is ever evaluated); when the left operand is an
    /// instance that overloads `__and__`/`__or__`, both sides are evaluated
    /// eagerly and handed to the dunder, matching how every other
    /// instance-operand operator in this evaluator behaves.
    fn evaluate_logical(&mut self, data: &InfixData, env: &Env) -> EvalResult {
        let left = self.evaluate(&data.left, env)?;

        if let Value::Instance(instance) = &left {
            if let Some((owner, method)) = find_method_with_owner(&instance.class, dunder_name(data.operator.r#type).unwrap()) {
                let right = self.evaluate(&data.right, env)?;
                return self.invoke_method(Rc::clone(instance), owner, method, vec![right], data.token.location);
            }
        }

        match data.operator.r#type {
            Type::And => if !left.is_truthy() { Ok(left) } else { self.evaluate(&data.right, env) },
            Type::Or => if left.is_truthy() { Ok(left) } else { self.evaluate(&data.right, env) },
            _ => unreachable!(),
        }
    }

    fn apply_operator(&mut self, operator: &Token, left: Value, right: Value) -> EvalResult {
        use Type::*;

        match operator.r#type {
            Equal | NotEqual => {
                if let Value::Instance(instance) = &left {
                    let name = if operator.r#type == Equal { "__eq__" } else { "__ne__" };
                    if let Some((owner, method)) = find_method_with_owner(&instance.class, name) {
                        return self.invoke_method(Rc::clone(instance), owner, method, vec![right], operator.location);
                    }
                }
                let equal = left.values_equal(&right);
                Ok(Value::Boolean(if operator.r#type == Equal { equal } else { !equal }))
            }

            Less | Greater | LessEqual | GreaterEqual => match (&left, &right) {
                (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                    let (a, b) = (as_float(&left), as_float(&right));
                    Ok(Value::Boolean(compare(operator.r#type, a.partial_cmp(&b))))
                }
                (Value::Str(a), Value::Str(b)) => {
                    Ok(Value::Boolean(compare(operator.r#type, Some(a.as_bytes().cmp(b.as_bytes())))))
                }
                (Value::Instance(instance), _) => self.dispatch_dunder(instance, operator, right),
                _ => Err(type_mismatch(operator, &left, &right)),
            },

            Plus | Minus | Star | Slash | SlashSlash | Percent => self.apply_arithmetic(operator, left, right),

            _ => unreachable!("no other operator token reaches the evaluator"),
        }
    }

    fn apply_arithmetic(&mut self, operator: &Token, left: Value, right: Value) -> EvalResult {
        use Type::*;

        match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => {
                let (a, b) = (*a, *b);
                match operator.r#type {
                    Plus => Ok(Value::Integer(a.wrapping_add(b))),
                    Minus => Ok(Value::Integer(a.wrapping_sub(b))),
                    Star => Ok(Value::Integer(a.wrapping_mul(b))),
                    Slash => {
                        if b == 0 {
                            Err(err(ErrorKind::Runtime, "division by zero", operator.location))
                        } else {
                            Ok(Value::Integer(a.wrapping_div(b)))
                        }
                    }
                    SlashSlash => {
                        if b == 0 {
                            Err(err(ErrorKind::Runtime, "division by zero", operator.location))
                        } else {
                            Ok(Value::Integer(floor_div(a, b)))
                        }
                    }
                    Percent => {
                        if b == 0 {
                            Err(err(ErrorKind::Runtime, "division by zero", operator.location))
                        } else {
                            Ok(Value::Integer(a.wrapping_rem(b)))
                        }
                    }
                    _ => unreachable!(),
                }
            }
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                let a = as_float(&left);
                let b = as_float(&right);
                match operator.r#type {
                    Plus => Ok(Value::Float(a + b)),
                    Minus => Ok(Value::Float(a - b)),
                    Star => Ok(Value::Float(a * b)),
                    Slash => Ok(Value::Float(a / b)),
                    SlashSlash => Ok(Value::Float((a / b).floor())),
                    Percent => Ok(Value::Float(a % b)),
                    _ => unreachable!(),
                }
            }
            (Value::Str(a), Value::Str(b)) if operator.r#type == Plus => {
                Ok(Value::str(format!("{a}{b}")))
            }
            (Value::Str(a), Value::Integer(n)) if operator.r#type == Star => {
                if *n < 0 {
                    Err(err(ErrorKind::Runtime, "cannot repeat a string a negative number of times", operator.location))
                } else {
                    Ok(Value::str(a.repeat(*n as usize)))
                }
            }
            (Value::Instance(instance), _) => self.dispatch_dunder(instance, operator, right),
            _ => Err(type_mismatch(operator, &left, &right)),
        }
    }

    fn dispatch_dunder(&mut self, instance: &Rc<Instance>, operator: &Token, right: Value) -> EvalResult {
        let name = dunder_name(operator.r#type).expect("only dunder-eligible operators reach here");
        match find_method_with_owner(&instance.class, name) {
            Some((owner, method)) => self.invoke_method(Rc::clone(instance), owner, method, vec![right], operator.location),
            None => Err(type_mismatch(operator, &Value::Instance(Rc::clone(instance)), &right)),
        }
    }

    fn evaluate_if(&mut self, data: &IfData, env: &Env) -> EvalResult {
        for branch in &data.branches {
            let condition = self.evaluate(&branch.condition, env)?;
            if condition.is_truthy() {
                let child = Environment::child_block(env);
                return self.execute_block(&branch.body, &child);
            }
        }

        match &data.else_body {
            Some(body) => {
                let child = Environment::child_block(env);
                self.execute_block(body, &child)
            }
            None => Ok(Value::Null),
        }
    }

    fn evaluate_call(&mut self, data: &CallData, env: &Env) -> EvalResult {
        if let Expr::Super(SuperData { method: None, .. }) = data.callee.as_ref() {
            return self.call_super_constructor(data, env);
        }

        let callee = self.evaluate(&data.callee, env)?;
        let mut args = Vec::with_capacity(data.args.len());
        for arg in &data.args {
            args.push(self.evaluate(arg, env)?);
        }
        self.call_value(callee, args, data.token.location)
    }

    /// Exposed to the built-in registry so host functions that accept a
    /// callback (`map`, `filter`, `reduce`, `forEach`) can invoke it through
    /// the same dispatch path as an ordinary call expression.
    pub(crate) fn call_value(&mut self, callee: Value, args: Vec<Value>, location: Location) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(&function, None, args, location),
            Value::BuiltinFunction(builtin) => {
                if !builtin.arity.accepts(args.len()) {
                    return Err(arity_error(&builtin.name, args.len(), location));
                }
                (builtin.func)(self, &args, location)
            }
            Value::BoundMethod(bound) => {
                self.invoke_method(Rc::clone(&bound.receiver), Rc::clone(&bound.owner), bound.method.clone(), args, location)
            }
            Value::Class(class) => self.instantiate(&class, args, location),
            other => Err(err(ErrorKind::Runtime, format!("'{}' is not callable", other.type_str()), location)),
        }
    }

    fn call_function(&mut self, function: &Rc<Function>, receiver: Option<(Rc<Instance>, Rc<Class>)>, args: Vec<Value>, location: Location) -> EvalResult {
        if args.len() != function.params.len() {
            return Err(err(
                ErrorKind::Runtime,
                format!("expected {} argument(s) but got {}", function.params.len(), args.len()),
                location,
            ));
        }

        let call_env = Environment::child_function(&function.closure);

        if let Some((instance, owner)) = receiver {
            call_env.borrow_mut().define("this", Value::Instance(instance)).map_err(|e| Flow::Error(e.with_location(location)))?;
            call_env.borrow_mut().define("$super", Value::Class(owner)).map_err(|e| Flow::Error(e.with_location(location)))?;
        }

        for (param, arg) in function.params.iter().zip(args.into_iter()) {
            call_env.borrow_mut().define(&param.lexeme, arg).map_err(|e| Flow::Error(e.with_location(param.location)))?;
        }

        match self.execute_block(&function.body, &call_env) {
            Ok(_) => Ok(Value::Null),
            Err(Flow::Return(value)) => Ok(value),
            Err(other) => Err(other),
        }
    }

    fn invoke_method(&mut self, receiver: Rc<Instance>, owner: Rc<Class>, method: Method, args: Vec<Value>, location: Location) -> EvalResult {
        match method {
            Method::User(function) => self.call_function(&function, Some((receiver, owner)), args, location),
            Method::Builtin(builtin) => {
                if args.len() != builtin.arity {
                    return Err(arity_error(&builtin.name, args.len(), location));
                }
                (builtin.func)(self, receiver, &args, location)
            }
        }
    }

    fn instantiate(&mut self, class: &Rc<Class>, args: Vec<Value>, location: Location) -> EvalResult {
        let instance = Rc::new(Instance::new(Rc::clone(class)));

        match find_constructor(class) {
            Some((owner, constructor)) => {
                self.call_function(&constructor, Some((Rc::clone(&instance), owner)), args, location)?;
            }
            None if !args.is_empty() => {
                return Err(err(ErrorKind::Instantiation, format!("'{}' has no constructor but {} argument(s) were given", class.name, args.len()), location));
            }
            None => {}
        }

        Ok(Value::Instance(instance))
    }

    fn call_super_constructor(&mut self, data: &CallData, env: &Env) -> EvalResult {
        let owner = self.lookup_super_owner(env, data.token.location)?;
        let this = self.lookup_this_instance(env, data.token.location)?;

        let parent = owner.parent.clone().ok_or_else(|| err(ErrorKind::Class, format!("'{}' has no superclass", owner.name), data.token.location))?;

        let mut args = Vec::with_capacity(data.args.len());
        for arg in &data.args {
            args.push(self.evaluate(arg, env)?);
        }

        match find_constructor(&parent) {
            Some((ctor_owner, constructor)) => {
                self.call_function(&constructor, Some((this, ctor_owner)), args, data.token.location)?;
            }
            None if !args.is_empty() => {
                return Err(err(ErrorKind::Instantiation, format!("'{}' has no constructor but {} argument(s) were given", parent.name, args.len()), data.token.location));
            }
            None => {}
        }

        Ok(Value::Null)
    }

    fn evaluate_index(&mut self, data: &IndexData, env: &Env) -> EvalResult {
        let object = self.evaluate(&data.object, env)?;
        let index = self.evaluate(&data.index, env)?;
        let location = data.token.location;

        match (&object, &index) {
            (Value::Array(items), Value::Integer(i)) => {
                let items = items.borrow();
                match in_bounds(*i, items.len()) {
                    Some(idx) => Ok(items[idx].clone()),
                    None => Err(err(ErrorKind::Runtime, format!("index {i} out of bounds for array of length {}", items.len()), location)),
                }
            }
            (Value::Hash(pairs), Value::Str(key)) => {
                Ok(pairs.borrow().get(key.as_ref()).cloned().unwrap_or(Value::Null))
            }
            (Value::Str(s), Value::Integer(i)) => {
                let chars: Vec<char> = s.chars().collect();
                match in_bounds(*i, chars.len()) {
                    Some(idx) => Ok(Value::str(chars[idx].to_string())),
                    None => Err(err(ErrorKind::Runtime, format!("index {i} out of bounds for string of length {}", chars.len()), location)),
                }
            }
            (Value::Instance(instance), _) => {
                match find_method_with_owner(&instance.class, "__getitem__") {
                    Some((owner, method)) => self.invoke_method(Rc::clone(instance), owner, method, vec![index], location),
                    None => Err(err(ErrorKind::TypeMismatch, format!("'{}' cannot be indexed", instance.class.name), location)),
                }
            }
            _ => Err(err(ErrorKind::TypeMismatch, format!("cannot index {} with {}", object.type_str(), index.type_str()), location)),
        }
    }

    fn evaluate_property(&mut self, data: &PropertyData, env: &Env) -> EvalResult {
        let object = self.evaluate(&data.object, env)?;
        let name = &data.name.lexeme;
        let location = data.name.location;

        match &object {
            Value::Instance(instance) => {
                if let Some(value) = instance.properties.borrow().get(name) {
                    return Ok(value.clone());
                }
                match find_method_with_owner(&instance.class, name) {
                    Some((owner, method)) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
                        receiver: Rc::clone(instance),
                        method,
                        name: name.clone(),
                        owner,
                    }))),
                    None => Err(err(ErrorKind::Property, format!("property not found: {name}"), location)),
                }
            }
            Value::Class(class) => match find_method_with_owner(class, name) {
                Some((_, Method::User(function))) => Ok(Value::Function(function)),
                Some((_, Method::Builtin(_))) => Err(err(ErrorKind::Property, format!("'{name}' is a builtin method and cannot be accessed unbound"), location)),
                None => Err(err(ErrorKind::Property, format!("property not found: {name}"), location)),
            },
            other => Err(err(ErrorKind::Property, format!("'{}' has no properties", other.type_str()), location)),
        }
    }

    fn evaluate_assignment(&mut self, data: &AssignmentData, env: &Env) -> EvalResult {
        let value = self.evaluate(&data.value, env)?;

        match data.target.as_ref() {
            Expr::Identifier(identifier) => {
                Environment::assign(env, &identifier.token, value.clone()).map_err(Flow::Error)?;
                Ok(value)
            }
            Expr::Property(property) => {
                let object = self.evaluate(&property.object, env)?;
                match object {
                    Value::Instance(instance) => {
                        instance.properties.borrow_mut().insert(property.name.lexeme.clone(), value.clone());
                        Ok(value)
                    }
                    other => Err(err(ErrorKind::Property, format!("cannot set a property on {}", other.type_str()), property.name.location)),
                }
            }
            Expr::Index(index) => self.assign_index(index, value, env),
            _ => unreachable!("parser only allows identifier/property/index assignment targets"),
        }
    }

    fn assign_index(&mut self, data: &IndexData, value: Value, env: &Env) -> EvalResult {
        let object = self.evaluate(&data.object, env)?;
        let index = self.evaluate(&data.index, env)?;
        let location = data.token.location;

        match (&object, &index) {
            (Value::Array(items), Value::Integer(i)) => {
                let mut items = items.borrow_mut();
                match in_bounds(*i, items.len()) {
                    Some(idx) => {
                        items[idx] = value.clone();
                        Ok(value)
                    }
                    None => Err(err(ErrorKind::Runtime, format!("index {i} out of bounds for array of length {}", items.len()), location)),
                }
            }
            (Value::Hash(pairs), Value::Str(key)) => {
                pairs.borrow_mut().insert(key.to_string(), value.clone());
                Ok(value)
            }
            (Value::Instance(instance), _) => {
                match find_method_with_owner(&instance.class, "__setitem__") {
                    Some((owner, method)) => {
                        self.invoke_method(Rc::clone(instance), owner, method, vec![index, value.clone()], location)?;
                        Ok(value)
                    }
                    None => Err(err(ErrorKind::TypeMismatch, format!("'{}' does not support item assignment", instance.class.name), location)),
                }
            }
            _ => Err(err(ErrorKind::TypeMismatch, format!("cannot assign into {} with {}", object.type_str(), index.type_str()), location)),
        }
    }

    fn evaluate_new(&mut self, data: &NewData, env: &Env) -> EvalResult {
        match Environment::resolve(env, &data.class_name) {
            Ok(Value::Class(class)) => {
                let mut args = Vec::with_capacity(data.args.len());
                for arg in &data.args {
                    args.push(self.evaluate(arg, env)?);
                }
                self.instantiate(&class, args, data.token.location)
            }
            Ok(other) => Err(err(ErrorKind::Instantiation, format!("'{}' is not a class", other.type_str()), data.class_name.location)),
            Err(_) => Err(err(ErrorKind::Instantiation, format!("class not found: {}", data.class_name.lexeme), data.class_name.location)),
        }
    }

    fn evaluate_super(&mut self, data: &SuperData, env: &Env) -> EvalResult {
        let owner = self.lookup_super_owner(env, data.token.location)?;
        let this = self.lookup_this_instance(env, data.token.location)?;
        let parent = owner.parent.clone().ok_or_else(|| err(ErrorKind::Class, format!("'{}' has no superclass", owner.name), data.token.location))?;

        match &data.method {
            Some(name) => match find_method_with_owner(&parent, &name.lexeme) {
                Some((found_owner, method)) => Ok(Value::BoundMethod(Rc::new(BoundMethod {
                    receiver: this,
                    method,
                    name: name.lexeme.clone(),
                    owner: found_owner,
                }))),
                None => Err(err(ErrorKind::Property, format!("property not found: {}", name.lexeme), name.location)),
            },
            None => Err(err(ErrorKind::Runtime, "'super' must be called directly, e.g. super(args)", data.token.location)),
        }
    }

    fn lookup_this(&mut self, env: &Env, location: Location) -> EvalResult {
        Ok(Value::Instance(self.lookup_this_instance(env, location)?))
    }

    fn lookup_this_instance(&mut self, env: &Env, location: Location) -> Result<Rc<Instance>, Flow> {
        match env.borrow().get("this") {
            Some(Value::Instance(instance)) => Ok(instance),
            _ => Err(err(ErrorKind::Runtime, "'this' used outside of a method", location)),
        }
    }

    fn lookup_super_owner(&mut self, env: &Env, location: Location) -> Result<Rc<Class>, Flow> {
        match env.borrow().get("$super") {
            Some(Value::Class(class)) => Ok(class),
            _ => Err(err(ErrorKind::Runtime, "'super' used outside of a method", location)),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Integer(n) => *n as f64,
        Value::Float(n) => *n,
        _ => unreachable!("caller already matched on numeric variants"),
    }
}

fn in_bounds(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        return None;
    }
    let index = index as usize;
    if index < len {
        Some(index)
    } else {
        None
    }
}

fn compare(operator: Type, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::*;
    match (operator, ordering) {
        (Type::Less, Some(Less)) => true,
        (Type::LessEqual, Some(Less | Equal)) => true,
        (Type::Greater, Some(Greater)) => true,
        (Type::GreaterEqual, Some(Greater | Equal)) => true,
        _ => false,
    }
}

/// `a` floor-divided by `b`, i.e. `(a as f64 / b as f64).floor()` without
/// going through floats: truncating division (`wrapping_div`) rounds toward
/// zero, so nudge down by one whenever that truncation rounded up — which
/// happens exactly when there's a nonzero remainder with a sign opposite
/// the divisor's.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }
}

/// The operator-token-to-dunder-name table from the evaluator's infix
/// resolution order. `**` is deliberately absent: the grammar never
/// produces it as an operator token, so exponentiation lives only as the
/// `pow` builtin.
fn dunder_name(operator: Type) -> Option<&'static str> {
    use Type::*;
    match operator {
        Plus => Some("__add__"),
        Minus => Some("__sub__"),
        Star => Some("__mul__"),
        Slash => Some("__div__"),
        SlashSlash => Some("__floordiv__"),
        Percent => Some("__mod__"),
        Equal => Some("__eq__"),
        NotEqual => Some("__ne__"),
        Less => Some("__lt__"),
        LessEqual => Some("__le__"),
        Greater => Some("__gt__"),
        GreaterEqual => Some("__ge__"),
        And => Some("__and__"),
        Or => Some("__or__"),
        _ => None,
    }
}

fn type_mismatch(operator: &Token, left: &Value, right: &Value) -> Flow {
    err(
        ErrorKind::TypeMismatch,
        format!(
            "Invalid operator '{}' for types {} and {}. This operation is not supported.",
            operator.lexeme, left.type_str(), right.type_str()
        ),
        operator.location,
    )
}

fn arity_error(name: &str, got: usize, location: Location) -> Flow {
    err(ErrorKind::Runtime, format!("'{name}' received {got} argument(s)"), location)
}
