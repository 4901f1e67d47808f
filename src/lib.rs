pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
mod stack;
pub mod suggest;
pub mod token;
pub mod value;

pub use ast::{Action, Block, Expression};
pub use interpreter::{run, Error, Interpreter, OutputSink};
pub use token::{Token, TokenKind};
pub use value::Value;
