use super::super::error::Error;
use super::{Argument, OutputSink};
use crate::diagnostic::Span;
use crate::value::Value;

pub fn builtin_length(
    _sink: &mut dyn OutputSink,
    args: &[Argument],
    _span: Span,
) -> Result<Option<Value>, Error> {
    let argument = &args[0];
    let count = match &argument.value {
        Value::Text(text) => text.chars().count(),
        Value::List(items) => items.len(),
        other => {
            return Err(Error::type_error(
                format!("LENGTH expects Text or List, found {}", other.tag()),
                argument.span,
            ))
        }
    };
    Ok(Some(Value::Number(count as f64)))
}
