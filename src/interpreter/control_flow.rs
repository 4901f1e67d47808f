use crate::value::Value;

/// Outcome of running a block: it either fell through or hit a `RETURN`.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Next,
    Return(Value),
}

impl ControlFlow {
    pub fn into_value(self) -> Option<Value> {
        match self {
            ControlFlow::Next => None,
            ControlFlow::Return(value) => Some(value),
        }
    }
}
