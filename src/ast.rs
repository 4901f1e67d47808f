use crate::diagnostic::Span;
use crate::token::Token;
use std::rc::Rc;

/// An ordered sequence of statements.
pub type Block = Vec<Action>;

/// A parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MakeProc {
        name: Token,
        params: Vec<Token>,
        body: Rc<Block>,
    },
    Assign {
        target: Token,
        value: Expression,
    },
    Conditional {
        condition: Expression,
        then_block: Block,
        else_block: Option<Block>,
    },
    RepeatN {
        count: Expression,
        body: Block,
    },
    RepeatUntil {
        condition: Expression,
        body: Block,
    },
    For {
        item: Token,
        list: Expression,
        body: Block,
    },
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Token),
    Identifier(Token),
    Unary {
        op: Token,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: Token,
        right: Box<Expression>,
    },
    /// Parenthesized expression; evaluates to its inner expression.
    Container(Box<Expression>),
    ListLiteral {
        open: Token,
        items: Vec<Expression>,
        close: Token,
    },
    Call {
        callee: Token,
        args: Vec<Expression>,
        close: Token,
    },
}

impl Expression {
    /// Source range covered by the expression.
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(token) | Expression::Identifier(token) => token.span(),
            Expression::Unary { op, operand } => op.span().merge(operand.span()),
            Expression::Binary { left, right, .. } => left.span().merge(right.span()),
            Expression::Container(inner) => inner.span(),
            Expression::ListLiteral { open, close, .. } => open.span().merge(close.span()),
            Expression::Call { callee, close, .. } => callee.span().merge(close.span()),
        }
    }
}
