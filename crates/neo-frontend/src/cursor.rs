// src/cursor.rs
//! Bidirectional navigation over a lexed token buffer.

use crate::token::{Token, TokenType};

/// Cursor over the tokens of one file.
///
/// Moving is clamped: `next_token` never passes the final EOF token and
/// `previous_token` never goes before the first token. Peeking past either
/// end yields an `Unknown` sentinel token.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
    invalid: Token,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            invalid: Token::invalid(),
        }
    }

    pub fn current(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.invalid)
    }

    /// Move forward one token and return the new current token.
    pub fn next_token(&mut self) -> &Token {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Move back one token and return the new current token.
    pub fn previous_token(&mut self) -> &Token {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn peek_next(&self) -> &Token {
        self.tokens.get(self.index + 1).unwrap_or(&self.invalid)
    }

    pub fn peek_previous(&self) -> &Token {
        self.index
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.invalid)
    }

    /// True iff the token after the current one has kind `ty`.
    pub fn expect_token(&self, ty: TokenType) -> bool {
        self.peek_next().ty == ty
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.current().ty, TokenType::Eof | TokenType::Unknown)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCollector;
    use crate::lexer::Lexer;

    fn cursor(source: &str) -> TokenCursor {
        let mut diag = DiagnosticCollector::new();
        let mut lexer = Lexer::new(source);
        assert!(lexer.lex(&mut diag));
        lexer.into_cursor()
    }

    #[test]
    fn navigation_is_clamped_at_both_ends() {
        let mut cursor = cursor("a b");
        assert_eq!(cursor.previous_token().lexeme, "a");
        assert_eq!(cursor.position(), 0);

        assert_eq!(cursor.next_token().lexeme, "b");
        assert_eq!(cursor.next_token().ty, TokenType::Eof);
        assert_eq!(cursor.next_token().ty, TokenType::Eof);
        assert_eq!(cursor.position(), 2);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn peeking_past_the_ends_gives_the_sentinel() {
        let mut cursor = cursor("a");
        assert_eq!(cursor.peek_previous().ty, TokenType::Unknown);
        assert_eq!(cursor.peek_next().ty, TokenType::Eof);

        cursor.next_token();
        assert_eq!(cursor.peek_next().ty, TokenType::Unknown);
        assert_eq!(cursor.peek_previous().lexeme, "a");
    }

    #[test]
    fn expect_token_looks_at_the_next_token() {
        let cursor = cursor("x : int");
        assert!(cursor.expect_token(TokenType::Colon));
        assert!(!cursor.expect_token(TokenType::Identifier));
    }

    #[test]
    fn empty_cursor_is_at_end() {
        let cursor = TokenCursor::new(Vec::new());
        assert_eq!(cursor.current().ty, TokenType::Unknown);
        assert!(cursor.is_at_end());
    }
}
