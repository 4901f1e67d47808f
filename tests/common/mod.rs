#![allow(dead_code)]

use cspi::interpreter::{run, Error};
use cspi::Value;

/// Runs a program, returning what it displayed and its top-level result.
pub fn run_capture(source: &str) -> (Vec<String>, Result<Option<Value>, Error>) {
    let mut out: Vec<String> = Vec::new();
    let result = run(source, &mut out);
    (out, result)
}

/// Lines displayed by a program that must succeed.
pub fn display_output(source: &str) -> Vec<String> {
    let (out, result) = run_capture(source);
    if let Err(error) = result {
        panic!("program failed: {} at {}", error, error.span());
    }
    out
}

/// Value of a program's top-level `RETURN`.
pub fn run_value(source: &str) -> Value {
    let (_, result) = run_capture(source);
    result
        .expect("program should succeed")
        .expect("program should RETURN a value")
}

pub fn run_error(source: &str) -> Error {
    let (_, result) = run_capture(source);
    result.expect_err("program should fail")
}

pub fn number(n: f64) -> Value {
    Value::Number(n)
}
