//! Host-provided procedures, installed into the outermost environment.
//!
//! - **IO**: `DISPLAY` writes one value to the output sink
//! - **Sequence**: `LENGTH` counts characters of text or elements of a list

mod io;
mod sequence;

pub use io::{builtin_display, OutputSink, StdoutSink};
pub use sequence::builtin_length;

use super::environment::{Binding, Environment};
use super::error::Error;
use crate::diagnostic::Span;
use crate::value::Value;

/// An evaluated argument together with the range of the expression that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: Value,
    pub span: Span,
}

pub type BuiltinFn = fn(&mut dyn OutputSink, &[Argument], Span) -> Result<Option<Value>, Error>;

/// A builtin procedure. The evaluator checks `arity` before evaluating any
/// argument, so `call` always receives exactly that many.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub call: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "DISPLAY",
        arity: 1,
        call: builtin_display,
    },
    Builtin {
        name: "LENGTH",
        arity: 1,
        call: builtin_length,
    },
];

pub fn install(env: &Environment) {
    for builtin in BUILTINS {
        env.define(builtin.name, Binding::Builtin(*builtin));
    }
}
