use super::builtins::{self, Argument, OutputSink};
use super::control_flow::ControlFlow;
use super::environment::{Binding, Environment, Procedure};
use super::error::Error;
use super::parser::parse_source;
use crate::ast::{Action, Block, Expression};
use crate::diagnostic::{Diagnostic, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};
use crate::value::{Value, ValueTag};
use std::rc::Rc;

/// Procedure calls nested deeper than this fail with a diagnostic.
pub const MAX_CALL_DEPTH: usize = 2_000;

/// Tree-walking evaluator.
///
/// The global environment is the root of the scope chain: it holds the
/// builtins and runs the program. Every procedure call gets a fresh child
/// of it, whatever scope the procedure was defined in.
pub struct Interpreter<'out> {
    global: Environment,
    sink: &'out mut dyn OutputSink,
    depth: usize,
}

impl<'out> Interpreter<'out> {
    pub fn new(sink: &'out mut dyn OutputSink) -> Self {
        let global = Environment::new();
        builtins::install(&global);
        Self { global, sink, depth: 0 }
    }

    pub fn global(&self) -> &Environment {
        &self.global
    }

    /// Runs a program. A top-level `RETURN` ends it early with that value.
    pub fn execute(&mut self, program: &Block) -> Result<Option<Value>, Error> {
        let global = self.global.clone();
        Ok(self.execute_block(program, &global)?.into_value())
    }

    pub fn execute_block(&mut self, block: &[Action], env: &Environment) -> Result<ControlFlow, Error> {
        ensure_sufficient_stack(|| -> Result<ControlFlow, Error> {
            for action in block {
                if let ControlFlow::Return(value) = self.execute_action(action, env)? {
                    return Ok(ControlFlow::Return(value));
                }
            }
            Ok(ControlFlow::Next)
        })
    }

    fn execute_action(&mut self, action: &Action, env: &Environment) -> Result<ControlFlow, Error> {
        match action {
            Action::MakeProc { name, params, body } => {
                tracing::trace!(name = %name.text, params = params.len(), "defining procedure");
                let procedure = Procedure {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::clone(body),
                };
                env.define(name.text.clone(), Binding::Procedure(Rc::new(procedure)));
                Ok(ControlFlow::Next)
            }
            Action::Assign { target, value } => {
                let value = self.evaluate(value, env)?;
                env.declare_or_assign(&target.text, value);
                Ok(ControlFlow::Next)
            }
            Action::Conditional {
                condition,
                then_block,
                else_block,
            } => {
                let branch = if self.condition(condition, env, "IF")? {
                    Some(then_block)
                } else {
                    else_block.as_ref()
                };
                match branch {
                    Some(block) => self.execute_block(block, &env.child()),
                    None => Ok(ControlFlow::Next),
                }
            }
            Action::RepeatN { count, body } => {
                let times = match self.evaluate(count, env)? {
                    Value::Number(n) if n > 0.0 => n.floor() as u64,
                    Value::Number(_) => 0,
                    other => {
                        return Err(Error::type_error(
                            format!("REPEAT expects a Number of times, found {}", other.tag()),
                            count.span(),
                        ))
                    }
                };
                for _ in 0..times {
                    if let ControlFlow::Return(value) = self.execute_block(body, &env.child())? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::Next)
            }
            Action::RepeatUntil { condition, body } => {
                while !self.condition(condition, env, "REPEAT UNTIL")? {
                    if let ControlFlow::Return(value) = self.execute_block(body, &env.child())? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::Next)
            }
            Action::For { item, list, body } => {
                let items = match self.evaluate(list, env)? {
                    Value::List(items) => items,
                    other => {
                        return Err(Error::type_error(
                            format!("FOR EACH expects a List, found {}", other.tag()),
                            list.span(),
                        ))
                    }
                };
                for element in items.iter() {
                    let frame = env.child();
                    frame.define(item.text.clone(), Binding::Value(element.clone()));
                    if let ControlFlow::Return(value) = self.execute_block(body, &frame)? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::Next)
            }
            Action::Return(value) => Ok(ControlFlow::Return(self.evaluate(value, env)?)),
            Action::Expression(expression) => {
                self.evaluate(expression, env)?;
                Ok(ControlFlow::Next)
            }
        }
    }

    fn condition(&mut self, condition: &Expression, env: &Environment, construct: &str) -> Result<bool, Error> {
        match self.evaluate(condition, env)? {
            Value::Boolean(flag) => Ok(flag),
            other => Err(Error::type_error(
                format!("{} condition must be Boolean, found {}", construct, other.tag()),
                condition.span(),
            )),
        }
    }

    pub fn evaluate(&mut self, expression: &Expression, env: &Environment) -> Result<Value, Error> {
        ensure_sufficient_stack(|| self.evaluate_expression(expression, env))
    }

    fn evaluate_expression(&mut self, expression: &Expression, env: &Environment) -> Result<Value, Error> {
        match expression {
            Expression::Literal(token) => literal(token),
            Expression::Identifier(token) => match env.lookup(token)? {
                Binding::Value(value) => Ok(value),
                Binding::Procedure(_) | Binding::Builtin(_) => Err(Error::ProcedureAsValue {
                    name: token.text.clone(),
                    span: token.span(),
                }),
            },
            Expression::Unary { op, operand } => {
                let value = self.evaluate(operand, env)?;
                unary(op, value, expression.span())
            }
            Expression::Binary { left, op, right } => {
                let lhs = self.evaluate(left, env)?;
                let rhs = self.evaluate(right, env)?;
                binary(op, lhs, rhs, expression.span())
            }
            Expression::Container(inner) => self.evaluate(inner, env),
            Expression::ListLiteral { items, .. } => {
                let values = items
                    .iter()
                    .map(|item| self.evaluate(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            Expression::Call { callee, args, .. } => self.call(callee, args, expression.span(), env),
        }
    }

    fn call(&mut self, callee: &Token, args: &[Expression], span: Span, env: &Environment) -> Result<Value, Error> {
        match env.lookup(callee)? {
            Binding::Value(_) => Err(Error::NotCallable {
                name: callee.text.clone(),
                span: callee.span(),
            }),
            Binding::Procedure(procedure) => {
                check_arity(&procedure.name.text, procedure.params.len(), args.len(), span)?;
                let frame = self.global.child();
                for (param, arg) in procedure.params.iter().zip(args) {
                    let value = self.evaluate(arg, env)?;
                    frame.define(param.text.clone(), Binding::Value(value));
                }
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(Error::RecursionLimit {
                        limit: MAX_CALL_DEPTH,
                        span,
                    });
                }
                tracing::debug!(procedure = %procedure.name.text, depth = self.depth, "calling procedure");
                self.depth += 1;
                let result = self.execute_block(&procedure.body, &frame);
                self.depth -= 1;
                Ok(result?.into_value().unwrap_or(Value::Null))
            }
            Binding::Builtin(builtin) => {
                check_arity(builtin.name, builtin.arity, args.len(), span)?;
                let arguments = args
                    .iter()
                    .map(|arg| -> Result<Argument, Error> {
                        Ok(Argument {
                            value: self.evaluate(arg, env)?,
                            span: arg.span(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                tracing::trace!(builtin = builtin.name, "calling builtin");
                let result = (builtin.call)(&mut *self.sink, &arguments, span)?;
                Ok(result.unwrap_or(Value::Null))
            }
        }
    }
}

fn check_arity(name: &str, expected: usize, found: usize, span: Span) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ArityMismatch {
            name: name.to_string(),
            expected,
            found,
            span,
        })
    }
}

fn literal(token: &Token) -> Result<Value, Error> {
    match token.kind {
        TokenKind::Number => token
            .text
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| Error::type_error(format!("`{}` is not a valid number", token.text), token.span())),
        TokenKind::Str => {
            let inner = token
                .text
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(&token.text);
            Ok(Value::text(inner))
        }
        TokenKind::Bool => Ok(Value::Boolean(token.text == "true")),
        _ => Err(Error::ExpectedExpression {
            found: token.describe(),
            span: token.span(),
        }),
    }
}

fn unary(op: &Token, operand: Value, span: Span) -> Result<Value, Error> {
    match (op.kind, operand) {
        (TokenKind::Subtract, Value::Number(n)) => Ok(Value::Number(-n)),
        (TokenKind::Not, Value::Boolean(flag)) => Ok(Value::Boolean(!flag)),
        (_, other) => Err(Error::type_error(
            format!("cannot apply {} to {}", op.describe(), other.tag()),
            span,
        )),
    }
}

fn unsupported(op: &Token, operand: ValueTag, span: Span) -> Error {
    Error::UnsupportedOperator {
        operator: op.describe(),
        operand,
        span,
    }
}

fn binary(op: &Token, lhs: Value, rhs: Value, span: Span) -> Result<Value, Error> {
    if lhs.tag() != rhs.tag() {
        return Err(Error::TypeMismatch {
            operator: op.describe(),
            left: lhs.tag(),
            right: rhs.tag(),
            span,
        });
    }

    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => number_op(op, a, b, span),
        (Value::Text(a), Value::Text(b)) => match op.kind {
            TokenKind::Add => Ok(Value::text(format!("{}{}", a, b))),
            TokenKind::Equal => Ok(Value::Boolean(a == b)),
            TokenKind::NotEqual => Ok(Value::Boolean(a != b)),
            _ => Err(unsupported(op, ValueTag::Text, span)),
        },
        (Value::Boolean(a), Value::Boolean(b)) => match op.kind {
            TokenKind::And => Ok(Value::Boolean(a && b)),
            TokenKind::Or => Ok(Value::Boolean(a || b)),
            TokenKind::Equal => Ok(Value::Boolean(a == b)),
            TokenKind::NotEqual => Ok(Value::Boolean(a != b)),
            _ => Err(unsupported(op, ValueTag::Boolean, span)),
        },
        (other, _) => Err(unsupported(op, other.tag(), span)),
    }
}

/// Division and modulo by zero follow IEEE 754: `Infinity`, `-Infinity`
/// or `NaN`.
fn number_op(op: &Token, a: f64, b: f64, span: Span) -> Result<Value, Error> {
    let value = match op.kind {
        TokenKind::Add => Value::Number(a + b),
        TokenKind::Subtract => Value::Number(a - b),
        TokenKind::Multiply => Value::Number(a * b),
        TokenKind::Divide => Value::Number(a / b),
        TokenKind::Mod => Value::Number(a % b),
        TokenKind::Greater => Value::Boolean(a > b),
        TokenKind::Less => Value::Boolean(a < b),
        TokenKind::GreaterEqual => Value::Boolean(a >= b),
        TokenKind::LessEqual => Value::Boolean(a <= b),
        TokenKind::Equal => Value::Boolean(a == b),
        TokenKind::NotEqual => Value::Boolean(a != b),
        _ => return Err(unsupported(op, ValueTag::Number, span)),
    };
    Ok(value)
}

/// Lex, parse and run `source`, sending `DISPLAY` output to `sink`.
pub fn run(source: &str, sink: &mut dyn OutputSink) -> Result<Option<Value>, Error> {
    let program = parse_source(source)?;
    Interpreter::new(sink).execute(&program)
}

pub fn run_with_diagnostics(source: &str, sink: &mut dyn OutputSink) -> Result<Option<Value>, Vec<Diagnostic>> {
    run(source, sink).map_err(|error| vec![error.to_diagnostic()])
}
