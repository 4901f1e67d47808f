use super::error::Error;
use crate::token::{Token, TokenKind};

/// Single-cursor reader over lexer output. The sequence always ends with an
/// `Eof` token, which is returned again for every read past the end.
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.offset);
            tokens.push(Token::new("", TokenKind::Eof, end));
        }
        Self { tokens, cursor: 0 }
    }

    fn eof_index(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Current token; advances the cursor.
    pub fn next(&mut self) -> Token {
        let index = self.cursor.min(self.eof_index());
        self.cursor += 1;
        self.tokens[index].clone()
    }

    /// Rewinds by one. Consecutive calls compose.
    pub fn back(&mut self) {
        debug_assert!(self.cursor > 0, "rewound past the first token");
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Next token that is not a newline or comment.
    pub fn next_sig(&mut self) -> Token {
        loop {
            let token = self.next();
            if !token.kind.is_insignificant() {
                return token;
            }
        }
    }

    /// Moves past insignificant tokens and returns the significant one
    /// without consuming it.
    pub fn jump_to_sig(&mut self) -> Token {
        let token = self.next_sig();
        self.back();
        token
    }

    /// Next significant token without moving the cursor at all.
    pub fn peek_sig(&mut self) -> Token {
        let saved = self.cursor;
        let token = self.next_sig();
        self.cursor = saved;
        token
    }

    pub fn take_sig_of_type(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let token = self.next_sig();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::unexpected_token(kind.describe(), token.describe(), token.span()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(lex(source).expect("lexing failed"))
    }

    #[test]
    fn test_next_past_end_repeats_eof() {
        let mut ts = stream("x");
        assert_eq!(ts.next().text, "x");
        assert_eq!(ts.next().kind, TokenKind::Newline);
        assert_eq!(ts.next().kind, TokenKind::Eof);
        assert_eq!(ts.next().kind, TokenKind::Eof);
        assert_eq!(ts.next_sig().kind, TokenKind::Eof);
    }

    #[test]
    fn test_next_sig_skips_newlines_and_comments() {
        let mut ts = stream("// heading\n\n  x // trailing\ny");
        assert_eq!(ts.next_sig().text, "x");
        assert_eq!(ts.next_sig().text, "y");
    }

    #[test]
    fn test_back_composes() {
        let mut ts = stream("a b c");
        ts.next();
        ts.next();
        assert_eq!(ts.next().text, "c");
        ts.back();
        ts.back();
        assert_eq!(ts.next().text, "b");
    }

    #[test]
    fn test_jump_to_sig_leaves_token_unconsumed() {
        let mut ts = stream("\n\n// c\nIF");
        assert_eq!(ts.jump_to_sig().kind, TokenKind::If);
        assert_eq!(ts.next().kind, TokenKind::If);
    }

    #[test]
    fn test_peek_sig_does_not_move() {
        let mut ts = stream("x\n← 1");
        ts.next();
        assert_eq!(ts.peek_sig().kind, TokenKind::Assign);
        assert_eq!(ts.next().kind, TokenKind::Newline);
    }

    #[test]
    fn test_take_sig_of_type_mismatch() {
        let mut ts = stream("x )");
        assert!(ts.take_sig_of_type(TokenKind::Identifier).is_ok());
        let error = ts.take_sig_of_type(TokenKind::OpenBrace).unwrap_err();
        assert_eq!(error.to_string(), "expected `{`, found `)`");
    }
}
