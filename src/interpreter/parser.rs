use super::error::Error;
use super::token_stream::TokenStream;
use crate::ast::{Action, Block, Expression};
use crate::diagnostic::Span;
use crate::lexer::lex;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};
use std::rc::Rc;

/// Lex and parse a whole program.
pub fn parse_source(source: &str) -> Result<Block, Error> {
    let tokens = lex(source)?;
    TokenParser::new(tokens).parse()
}

/// Blocks and sub-expressions nested deeper than this are rejected.
pub const MAX_NESTING_DEPTH: usize = 2_000;

pub struct TokenParser {
    tokens: TokenStream,
    depth: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            depth: 0,
        }
    }

    /// Runs `parse` one nesting level down. `span` is the token that opened
    /// the level.
    fn nested<T>(&mut self, span: Span, parse: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.depth -= 1;
        result
    }

    pub fn parse(&mut self) -> Result<Block, Error> {
        let program = self.parse_block(true)?;
        tracing::debug!(statements = program.len(), "parsed program");
        Ok(program)
    }

    /// Statements up to the closing `}` of a nested block, or up to end of
    /// input for the root block. The opening `{` is already consumed.
    fn parse_block(&mut self, root: bool) -> Result<Block, Error> {
        let mut actions = Vec::new();

        while self.tokens.jump_to_sig().kind != TokenKind::Eof {
            let token = self.tokens.next();
            let action = match token.kind {
                TokenKind::CloseBrace if !root => return Ok(actions),
                TokenKind::Procedure => self.parse_procedure()?,
                TokenKind::If => self.parse_conditional()?,
                TokenKind::Repeat => self.parse_repeat()?,
                TokenKind::For => self.parse_for()?,
                TokenKind::Return => Action::Return(self.parse_expression()?),
                TokenKind::Identifier => self.parse_identifier_line(token)?,
                _ => {
                    return Err(Error::InvalidStatement {
                        found: token.describe(),
                        span: token.span(),
                    })
                }
            };
            actions.push(action);
        }

        if root {
            Ok(actions)
        } else {
            let eof = self.tokens.next();
            Err(Error::UnterminatedBlock { span: eof.span() })
        }
    }

    fn parse_braced_block(&mut self) -> Result<Block, Error> {
        let open = self.tokens.take_sig_of_type(TokenKind::OpenBrace)?;
        self.nested(open.span(), |parser| parser.parse_block(false))
    }

    fn parse_procedure(&mut self) -> Result<Action, Error> {
        let name = self.tokens.take_sig_of_type(TokenKind::Identifier)?;
        self.tokens.take_sig_of_type(TokenKind::OpenParen)?;

        let mut params = Vec::new();
        loop {
            let token = self.tokens.next_sig();
            match token.kind {
                TokenKind::CloseParen => break,
                TokenKind::Identifier => params.push(token),
                _ => {
                    return Err(Error::unexpected_token(
                        "parameter name",
                        token.describe(),
                        token.span(),
                    ))
                }
            }

            let following = self.tokens.next_sig();
            match following.kind {
                TokenKind::CloseParen => break,
                TokenKind::Comma => {}
                _ => {
                    return Err(Error::unexpected_token(
                        TokenKind::CloseParen.describe(),
                        following.describe(),
                        following.span(),
                    ))
                }
            }
        }

        let body = self.parse_braced_block()?;
        Ok(Action::MakeProc {
            name,
            params,
            body: Rc::new(body),
        })
    }

    fn parse_conditional(&mut self) -> Result<Action, Error> {
        self.tokens.take_sig_of_type(TokenKind::OpenParen)?;
        let condition = self.parse_expression()?;
        self.tokens.take_sig_of_type(TokenKind::CloseParen)?;
        let then_block = self.parse_braced_block()?;

        let else_block = if self.tokens.next_sig().kind == TokenKind::Else {
            let following = self.tokens.next_sig();
            if following.kind == TokenKind::If {
                Some(vec![self.nested(following.span(), |parser| parser.parse_conditional())?])
            } else {
                self.tokens.back();
                Some(self.parse_braced_block()?)
            }
        } else {
            self.tokens.back();
            None
        };

        Ok(Action::Conditional {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_repeat(&mut self) -> Result<Action, Error> {
        if self.tokens.next_sig().kind == TokenKind::Until {
            let condition = self.parse_expression()?;
            let body = self.parse_braced_block()?;
            return Ok(Action::RepeatUntil { condition, body });
        }
        self.tokens.back();

        let count = self.parse_expression()?;
        self.tokens.take_sig_of_type(TokenKind::Times)?;
        let body = self.parse_braced_block()?;
        Ok(Action::RepeatN { count, body })
    }

    fn parse_for(&mut self) -> Result<Action, Error> {
        self.tokens.take_sig_of_type(TokenKind::Each)?;
        let item = self.tokens.take_sig_of_type(TokenKind::Identifier)?;
        self.tokens.take_sig_of_type(TokenKind::In)?;
        let list = self.parse_expression()?;
        let body = self.parse_braced_block()?;
        Ok(Action::For { item, list, body })
    }

    /// `name ← expr`, or an expression that starts with an identifier.
    fn parse_identifier_line(&mut self, identifier: Token) -> Result<Action, Error> {
        if self.tokens.peek_sig().kind == TokenKind::Assign {
            self.tokens.take_sig_of_type(TokenKind::Assign)?;
            let value = self.parse_expression()?;
            return Ok(Action::Assign {
                target: identifier,
                value,
            });
        }

        self.tokens.back();
        Ok(Action::Expression(self.parse_expression()?))
    }

    /// Binary operators share one precedence level and group to the right:
    /// the right operand is a full expression.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        let start = self.tokens.peek_sig().span();
        self.nested(start, |parser| parser.parse_operand_chain())
    }

    fn parse_operand_chain(&mut self) -> Result<Expression, Error> {
        let mut expression: Option<Expression> = None;

        loop {
            let token = self.tokens.next_sig();
            match expression.take() {
                None => {
                    expression = Some(match token.kind {
                        TokenKind::Number | TokenKind::Str | TokenKind::Bool => Expression::Literal(token),
                        TokenKind::Identifier => Expression::Identifier(token),
                        TokenKind::OpenParen => {
                            let inner = self.parse_expression()?;
                            self.tokens.take_sig_of_type(TokenKind::CloseParen)?;
                            Expression::Container(Box::new(inner))
                        }
                        TokenKind::OpenBracket => {
                            let (items, close) = self.parse_expression_list(TokenKind::CloseBracket)?;
                            Expression::ListLiteral {
                                open: token,
                                items,
                                close,
                            }
                        }
                        TokenKind::Subtract | TokenKind::Not => {
                            let operand = self.parse_expression()?;
                            return Ok(Expression::Unary {
                                op: token,
                                operand: Box::new(operand),
                            });
                        }
                        _ => {
                            return Err(Error::ExpectedExpression {
                                found: token.describe(),
                                span: token.span(),
                            });
                        }
                    });
                }
                Some(left) => {
                    if token.kind.is_binary_operator() {
                        let right = self.parse_expression()?;
                        expression = Some(Expression::Binary {
                            left: Box::new(left),
                            op: token,
                            right: Box::new(right),
                        });
                    } else if token.kind == TokenKind::OpenParen {
                        match left {
                            Expression::Identifier(callee) => {
                                let (args, close) = self.parse_expression_list(TokenKind::CloseParen)?;
                                expression = Some(Expression::Call { callee, args, close });
                            }
                            other => {
                                self.tokens.back();
                                return Ok(other);
                            }
                        }
                    } else {
                        self.tokens.back();
                        return Ok(left);
                    }
                }
            }
        }
    }

    /// Comma-separated expressions up to `closer`, which is consumed and
    /// returned.
    fn parse_expression_list(&mut self, closer: TokenKind) -> Result<(Vec<Expression>, Token), Error> {
        let mut items = Vec::new();

        loop {
            let token = self.tokens.next_sig();
            if token.kind == closer {
                return Ok((items, token));
            }
            self.tokens.back();

            items.push(self.parse_expression()?);

            let comma_or_close = self.tokens.next_sig();
            if comma_or_close.kind == closer {
                return Ok((items, comma_or_close));
            }
            if comma_or_close.kind != TokenKind::Comma {
                return Err(Error::unexpected_token(
                    closer.describe(),
                    comma_or_close.describe(),
                    comma_or_close.span(),
                ));
            }
        }
    }
}
