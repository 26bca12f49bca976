use crate::error::SourceError;
use crate::object::Value;

/// The internal propagation channel used by the evaluator. `return`, `break`,
/// and `continue` are not `Value`s (see the invariant that signals never
/// appear as arguments, array elements, hash values, or instance
/// properties) — they ride the `Err` side of `EvalResult` and are absorbed
/// by the nearest function (`Return`) or loop (`Break`/`Continue`) frame.
/// `Error` is the propagating twin of the first-class `Value::Error`: it is
/// what travels between evaluation steps, while `Value::Error` is what a
/// user sees or inspects once it is captured into an ordinary value.
#[derive(Debug, Clone)]
pub enum Flow {
    Return(Value),
    Break,
    Continue,
    Error(SourceError),
}

impl From<SourceError> for Flow {
    fn from(err: SourceError) -> Self {
        Flow::Error(err)
    }
}

pub type EvalResult = Result<Value, Flow>;
