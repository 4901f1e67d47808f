use crate::diagnostic::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Procedure,
    For,
    Each,
    In,
    If,
    Else,
    Return,
    Mod,
    Not,
    And,
    Or,
    Repeat,
    Times,
    Until,

    // Literals and Identifiers
    Number,
    Str,
    Bool,
    Identifier,

    // Assignment and comparison
    Assign,
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,

    // Arithmetic Operators
    Add,
    Subtract,
    Multiply,
    Divide,

    // Delimiters
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Dot,

    // Structure
    Newline,
    Comment,
    Eof,
}

impl TokenKind {
    /// Newlines and comments never affect the grammar.
    pub fn is_insignificant(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment)
    }

    /// Operators accepted after a complete operand.
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Add
                | TokenKind::Subtract
                | TokenKind::Divide
                | TokenKind::Multiply
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Greater
                | TokenKind::Less
                | TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::LessEqual
                | TokenKind::GreaterEqual
                | TokenKind::Mod
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Procedure => "`PROCEDURE`",
            TokenKind::For => "`FOR`",
            TokenKind::Each => "`EACH`",
            TokenKind::In => "`IN`",
            TokenKind::If => "`IF`",
            TokenKind::Else => "`ELSE`",
            TokenKind::Return => "`RETURN`",
            TokenKind::Mod => "`MOD`",
            TokenKind::Not => "`NOT`",
            TokenKind::And => "`AND`",
            TokenKind::Or => "`OR`",
            TokenKind::Repeat => "`REPEAT`",
            TokenKind::Times => "`TIMES`",
            TokenKind::Until => "`UNTIL`",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Bool => "boolean",
            TokenKind::Identifier => "identifier",
            TokenKind::Assign => "`←`",
            TokenKind::Equal => "`=`",
            TokenKind::NotEqual => "`≠`",
            TokenKind::Greater => "`>`",
            TokenKind::Less => "`<`",
            TokenKind::GreaterEqual => "`≥`",
            TokenKind::LessEqual => "`≤`",
            TokenKind::Add => "`+`",
            TokenKind::Subtract => "`-`",
            TokenKind::Multiply => "`*`",
            TokenKind::Divide => "`/`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::OpenBrace => "`{`",
            TokenKind::CloseBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.describe())
    }
}

/// A lexed token. `offset` is the byte offset just past the token's last
/// character, so the token covers `offset - text.len()..offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, offset: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            offset,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset - self.text.len(), self.offset)
    }

    /// Human-readable form used in "found ..." messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof | TokenKind::Newline | TokenKind::Comment => self.kind.describe().to_string(),
            TokenKind::Identifier => format!("identifier `{}`", self.text),
            _ => format!("`{}`", self.text),
        }
    }
}

pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("PROCEDURE", TokenKind::Procedure),
    ("FOR", TokenKind::For),
    ("EACH", TokenKind::Each),
    ("IN", TokenKind::In),
    ("IF", TokenKind::If),
    ("ELSE", TokenKind::Else),
    ("RETURN", TokenKind::Return),
    ("MOD", TokenKind::Mod),
    ("NOT", TokenKind::Not),
    ("AND", TokenKind::And),
    ("OR", TokenKind::Or),
    ("REPEAT", TokenKind::Repeat),
    ("TIMES", TokenKind::Times),
    ("UNTIL", TokenKind::Until),
    ("true", TokenKind::Bool),
    ("false", TokenKind::Bool),
];

/// Symbolic operators. The ASCII spellings of `←`, `≠`, `≤` and `≥` exist for
/// keyboards that cannot type the symbols and lex to the same kind.
pub const OPERATORS: &[(&str, TokenKind)] = &[
    ("←", TokenKind::Assign),
    ("<--", TokenKind::Assign),
    ("=", TokenKind::Equal),
    ("≠", TokenKind::NotEqual),
    ("=/=", TokenKind::NotEqual),
    ("!=", TokenKind::NotEqual),
    ("≤", TokenKind::LessEqual),
    ("<==", TokenKind::LessEqual),
    ("<=", TokenKind::LessEqual),
    ("≥", TokenKind::GreaterEqual),
    (">==", TokenKind::GreaterEqual),
    (">=", TokenKind::GreaterEqual),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("+", TokenKind::Add),
    ("-", TokenKind::Subtract),
    ("*", TokenKind::Multiply),
    ("/", TokenKind::Divide),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("//", TokenKind::Comment),
];

pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(text, _)| *text == word)
        .map(|(_, kind)| *kind)
}

pub fn operator(text: &str) -> Option<TokenKind> {
    OPERATORS
        .iter()
        .find(|(op, _)| *op == text)
        .map(|(_, kind)| *kind)
}

/// True when some operator starts with `text`.
pub fn is_partial_operator(text: &str) -> bool {
    OPERATORS.iter().any(|(op, _)| op.starts_with(text))
}
