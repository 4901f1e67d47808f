use crate::diagnostic::Span;
use crate::interpreter::Error;
use crate::token::{self, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Word,
    Number,
    Operator,
    Comment,
    Str,
}

/// Single-pass lexer. The cursor only moves forward when a character is
/// accepted, so a character that ends a token is re-examined as the start of
/// the next one.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Vec<(usize, char)>,
    pos: usize,
    state: State,
    pending: String,
    pending_start: usize,
    tokens: Vec<Token>,
}

pub fn lex(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(source).run()
}

fn classify(c: char) -> State {
    if c.is_ascii_alphabetic() || c == '_' {
        State::Word
    } else if c.is_ascii_digit() {
        State::Number
    } else if c == '"' {
        State::Str
    } else {
        State::Operator
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut chars: Vec<(usize, char)> = source.char_indices().collect();
        // Terminating newline so the last token is always flushed.
        chars.push((source.len(), '\n'));
        Self {
            source,
            chars,
            pos: 0,
            state: State::None,
            pending: String::new(),
            pending_start: 0,
            tokens: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<Vec<Token>, Error> {
        while self.pos < self.chars.len() {
            let (offset, c) = self.chars[self.pos];
            match self.state {
                State::None => {
                    if c == '\n' {
                        let text = if self.at_end() { "" } else { "\n" };
                        self.tokens.push(Token::new(text, TokenKind::Newline, offset + text.len()));
                        self.pos += 1;
                    } else if c.is_whitespace() {
                        self.pos += 1;
                    } else {
                        self.state = classify(c);
                        self.pending_start = self.pos;
                    }
                }
                State::Word => {
                    if is_word_char(c) {
                        self.accept(c);
                    } else {
                        let kind = token::keyword(&self.pending).unwrap_or(TokenKind::Identifier);
                        self.emit(kind, offset);
                    }
                }
                State::Number => {
                    if c.is_ascii_digit() || (c == '.' && !self.pending.contains('.')) {
                        self.accept(c);
                    } else {
                        self.emit(TokenKind::Number, offset);
                    }
                }
                State::Str => {
                    if self.pending.is_empty() {
                        self.accept(c);
                    } else if self.at_end() {
                        let start = self.chars[self.pending_start].0;
                        return Err(Error::UnterminatedString {
                            span: Span::new(start, self.source.len()),
                        });
                    } else if c == '"' {
                        self.accept(c);
                        self.emit(TokenKind::Str, offset + 1);
                    } else {
                        self.accept(c);
                    }
                }
                State::Comment => {
                    if c == '\n' {
                        self.emit(TokenKind::Comment, offset);
                    } else {
                        self.accept(c);
                    }
                }
                State::Operator => self.operator_step(offset, c)?,
            }
        }

        self.tokens.push(Token::new("", TokenKind::Eof, self.source.len()));
        tracing::trace!(tokens = self.tokens.len(), "lexed source");
        Ok(self.tokens)
    }

    fn at_end(&self) -> bool {
        self.pos + 1 == self.chars.len()
    }

    fn accept(&mut self, c: char) {
        self.pending.push(c);
        self.pos += 1;
    }

    fn emit(&mut self, kind: TokenKind, end: usize) {
        let text = std::mem::take(&mut self.pending);
        self.tokens.push(Token::new(text, kind, end));
        self.state = State::None;
    }

    /// Maximal munch over the operator table.
    fn operator_step(&mut self, offset: usize, c: char) -> Result<(), Error> {
        let mut candidate = self.pending.clone();
        candidate.push(c);
        if token::is_partial_operator(&candidate) {
            self.accept(c);
            return Ok(());
        }

        if self.pending.is_empty() {
            return Err(Error::UnrecognizedCharacter {
                found: c,
                span: Span::new(offset, offset + c.len_utf8()),
            });
        }

        match token::operator(&self.pending) {
            Some(TokenKind::Comment) => self.state = State::Comment,
            Some(kind) => self.emit(kind, offset),
            None => self.back_off()?,
        }
        Ok(())
    }

    /// The pending text is a prefix of some operator but not an operator
    /// itself: keep the longest prefix that is one and rescan the rest.
    fn back_off(&mut self) -> Result<(), Error> {
        let pending: Vec<char> = self.pending.chars().collect();
        for keep in (1..pending.len()).rev() {
            let prefix: String = pending[..keep].iter().collect();
            if let Some(kind) = token::operator(&prefix) {
                self.pending = prefix;
                self.pos = self.pending_start + keep;
                if kind == TokenKind::Comment {
                    self.state = State::Comment;
                } else {
                    let end = self.chars[self.pos].0;
                    self.emit(kind, end);
                }
                return Ok(());
            }
        }

        let (start, first) = self.chars[self.pending_start];
        Err(Error::UnrecognizedCharacter {
            found: first,
            span: Span::new(start, start + first.len_utf8()),
        })
    }
}
