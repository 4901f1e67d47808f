pub mod token_stream;
pub mod parser;
pub mod environment;
pub mod error;
pub mod control_flow;
pub mod builtins;
pub mod evaluator;

pub use error::Error;
pub use control_flow::ControlFlow;
pub use environment::{Binding, Environment, Procedure};
pub use parser::{parse_source, TokenParser};
pub use builtins::{OutputSink, StdoutSink};
pub use evaluator::{run, run_with_diagnostics, Interpreter};
