//! Output built-in functions.

use super::super::error::Error;
use super::{Argument};
use crate::diagnostic::Span;
use crate::value::Value;

/// Receives every rendering produced by `DISPLAY`.
pub trait OutputSink {
    fn write(&mut self, text: &str);
}

/// Writes each rendering to standard output on its own line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&mut self, text: &str) {
        use std::io::Write;
        println!("{}", text);
        std::io::stdout().flush().ok();
    }
}

impl OutputSink for Vec<String> {
    fn write(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

pub fn builtin_display(
    sink: &mut dyn OutputSink,
    args: &[Argument],
    _span: Span,
) -> Result<Option<Value>, Error> {
    let argument = &args[0];
    match &argument.value {
        Value::List(_) => Err(Error::invalid_argument(
            "cannot display a list directly",
            argument.span,
        )),
        Value::Null => Err(Error::invalid_argument("cannot display null", argument.span)),
        value => {
            sink.write(&value.to_string());
            Ok(None)
        }
    }
}
