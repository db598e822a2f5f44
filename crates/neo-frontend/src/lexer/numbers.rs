// src/lexer/numbers.rs
//
// Number literal lexing: decimal integers, hex integers and floats.

use crate::errors::LexerError;
use crate::{Token, TokenType};

use super::Lexer;

impl<'src> Lexer<'src> {
    /// Scan a number whose first digit has already been consumed.
    pub(super) fn number(&mut self, first: char) -> Token {
        if first == '0' && matches!(self.peek_byte(), Some(b'x' | b'X')) {
            return self.hex_number();
        }

        self.consume_while(|b| b.is_ascii_digit());

        // A single '.' belongs to the literal only when a digit follows it,
        // so `12.5` is a float while `12.` is an integer and a dot.
        if self.peek_byte() == Some(b'.')
            && let Some(next) = self.peek_next()
            && next.is_ascii_digit()
        {
            self.current += 1;
            self.column += 1;
            self.consume_while(|b| b.is_ascii_digit());
            return self.make_token(TokenType::FloatLiteral);
        }

        self.make_token(TokenType::IntLiteral)
    }

    fn hex_number(&mut self) -> Token {
        // Consume the 'x'
        self.current += 1;
        self.column += 1;

        let digits = self.consume_while(|b| b.is_ascii_hexdigit());
        if digits == 0 {
            let span = self.start_span();
            tracing::debug!(line = span.line, col = span.column, "lexer error: empty hex literal");
            self.errors
                .push((span, LexerError::EmptyHexLiteral { span: span.into() }));
        }
        self.make_token(TokenType::HexLiteral)
    }

    /// Consume ASCII bytes matching `pred`, returning how many were consumed.
    fn consume_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let begin = self.current;
        while let Some(b) = self.peek_byte() {
            if !pred(b) {
                break;
            }
            self.current += 1;
            self.column += 1;
        }
        self.current - begin
    }
}
