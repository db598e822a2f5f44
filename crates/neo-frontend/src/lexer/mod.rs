// src/lexer/mod.rs

mod numbers;
mod strings;

use std::sync::Arc;

use crate::cursor::TokenCursor;
use crate::diagnostics::DiagnosticCollector;
use crate::errors::LexerError;
use crate::source::SourceLoc;
use crate::{Span, Token, TokenType};

/// Smallest byte value that starts a multi-byte UTF-8 sequence (non-ASCII).
const UTF8_MULTIBYTE: u8 = 0x80;

/// Scans a whole source file into a token buffer.
#[derive(Clone)]
pub struct Lexer<'src> {
    pub(crate) source: &'src str,
    pub(crate) bytes: &'src [u8],
    pub(crate) file: Option<Arc<str>>,
    pub(crate) current: usize,
    pub(crate) start: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) start_line: u32,
    pub(crate) start_column: u32,
    pub(crate) tokens: Vec<Token>,
    // Non-fatal errors, flushed to the collector when `lex` returns
    pub(crate) errors: Vec<(Span, LexerError)>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            file: None,
            current: 0,
            start: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a lexer whose diagnostics are attributed to `file`.
    pub fn with_file(source: &'src str, file: impl Into<Arc<str>>) -> Self {
        let mut lexer = Self::new(source);
        lexer.file = Some(file.into());
        lexer
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn file(&self) -> Option<&Arc<str>> {
        self.file.as_ref()
    }

    /// Tokenize the whole source.
    ///
    /// Returns `false` only when an unexpected character stopped the scan.
    /// Either way the buffer ends with exactly one EOF token, and every
    /// lexical error found so far has been reported to `diag`.
    pub fn lex(&mut self, diag: &mut DiagnosticCollector) -> bool {
        self.reset();

        let completed = loop {
            match self.next_token() {
                Ok(token) if token.ty == TokenType::Eof => {
                    self.tokens.push(token);
                    break true;
                }
                Ok(token) => self.tokens.push(token),
                Err(error) => {
                    let span = self.start_span();
                    self.errors.push((span, error));
                    self.start = self.current;
                    self.start_line = self.line;
                    self.start_column = self.column;
                    self.tokens.push(self.make_token(TokenType::Eof));
                    break false;
                }
            }
        };

        for (span, error) in self.errors.drain(..) {
            let loc = SourceLoc::new(span.line, span.column, self.file.clone());
            diag.report_diagnostic(loc, span, &error);
        }
        tracing::debug!(
            tokens = self.tokens.len(),
            completed,
            file = self.file.as_deref().unwrap_or("<input>"),
            "lexed"
        );
        completed
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Hand the token buffer to a cursor for parsing.
    pub fn into_cursor(self) -> TokenCursor {
        TokenCursor::new(self.tokens)
    }

    fn reset(&mut self) {
        self.current = 0;
        self.start = 0;
        self.line = 1;
        self.column = 1;
        self.start_line = 1;
        self.start_column = 1;
        self.tokens.clear();
        self.errors.clear();
    }

    /// Scan the next token. Malformed literals are recorded and skipped;
    /// an unexpected character is returned as the error.
    fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            self.skip_trivia();

            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;

            let Some(c) = self.advance() else {
                return Ok(self.make_token(TokenType::Eof));
            };

            let token = match c {
                // Single character tokens
                '(' => self.make_token(TokenType::LParen),
                ')' => self.make_token(TokenType::RParen),
                '{' => self.make_token(TokenType::LBrace),
                '}' => self.make_token(TokenType::RBrace),
                '[' => self.make_token(TokenType::LBracket),
                ']' => self.make_token(TokenType::RBracket),
                ',' => self.make_token(TokenType::Comma),
                ';' => self.make_token(TokenType::Semicolon),
                '.' => self.make_token(TokenType::Dot),
                '?' => self.make_token(TokenType::Question),
                '~' => self.make_token(TokenType::Tilde),

                // Single or double character tokens
                ':' => {
                    if self.match_byte(b':') {
                        self.make_token(TokenType::ColonColon)
                    } else {
                        self.make_token(TokenType::Colon)
                    }
                }
                '+' => {
                    if self.match_byte(b'+') {
                        self.make_token(TokenType::PlusPlus)
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::PlusEq)
                    } else {
                        self.make_token(TokenType::Plus)
                    }
                }
                '-' => {
                    if self.match_byte(b'-') {
                        self.make_token(TokenType::MinusMinus)
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::MinusEq)
                    } else if self.match_byte(b'>') {
                        self.make_token(TokenType::Arrow)
                    } else {
                        self.make_token(TokenType::Minus)
                    }
                }
                '*' => {
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::StarEq)
                    } else {
                        self.make_token(TokenType::Star)
                    }
                }
                '/' => {
                    // Comments were consumed by skip_trivia
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::SlashEq)
                    } else {
                        self.make_token(TokenType::Slash)
                    }
                }
                '%' => {
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::PercentEq)
                    } else {
                        self.make_token(TokenType::Percent)
                    }
                }
                '=' => {
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::EqEq)
                    } else {
                        self.make_token(TokenType::Eq)
                    }
                }
                '!' => {
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::BangEq)
                    } else {
                        self.make_token(TokenType::Bang)
                    }
                }
                '&' => {
                    if self.match_byte(b'&') {
                        self.make_token(TokenType::AmpAmp)
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::AmpEq)
                    } else {
                        self.make_token(TokenType::Ampersand)
                    }
                }
                '|' => {
                    if self.match_byte(b'|') {
                        self.make_token(TokenType::PipePipe)
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::PipeEq)
                    } else {
                        self.make_token(TokenType::Pipe)
                    }
                }
                '^' => {
                    if self.match_byte(b'=') {
                        self.make_token(TokenType::CaretEq)
                    } else {
                        self.make_token(TokenType::Caret)
                    }
                }

                // Up to three character tokens
                '<' => {
                    if self.match_byte(b'<') {
                        if self.match_byte(b'=') {
                            self.make_token(TokenType::LessLessEq)
                        } else {
                            self.make_token(TokenType::LessLess)
                        }
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::LtEq)
                    } else {
                        self.make_token(TokenType::Lt)
                    }
                }
                '>' => {
                    if self.match_byte(b'>') {
                        if self.match_byte(b'=') {
                            self.make_token(TokenType::GreaterGreaterEq)
                        } else {
                            self.make_token(TokenType::GreaterGreater)
                        }
                    } else if self.match_byte(b'=') {
                        self.make_token(TokenType::GtEq)
                    } else {
                        self.make_token(TokenType::Gt)
                    }
                }

                '"' => self.string(),
                '\'' => match self.char_literal() {
                    Some(token) => token,
                    None => continue,
                },

                c if c.is_ascii_digit() => self.number(c),
                c if c == '_' || c.is_ascii_alphabetic() => self.identifier(),

                _ => return Err(self.error_unexpected_char(c)),
            };
            return Ok(token);
        }
    }

    /// Skip whitespace, newlines and comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b' ' | b'\t' | b'\r' => {
                    self.current += 1;
                    self.column += 1;
                }
                b'\n' => self.newline(),
                b'/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                b'/' if self.peek_next() == Some('*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// Consume a `\n` and move to the start of the next line.
    pub(crate) fn newline(&mut self) {
        self.current += 1;
        self.line += 1;
        self.column = 1;
    }

    /// Skip a line comment (everything until newline or EOF).
    fn skip_line_comment(&mut self) {
        while self.current < self.bytes.len() && self.bytes[self.current] != b'\n' {
            self.current += 1;
            self.column += 1;
        }
    }

    /// Skip a `/* ... */` comment, tracking embedded newlines.
    fn skip_block_comment(&mut self) {
        let open = Span::new(self.current, self.current + 2, self.line, self.column);
        self.current += 2;
        self.column += 2;

        while let Some(b) = self.peek_byte() {
            match b {
                b'*' if self.peek_next() == Some('/') => {
                    self.current += 2;
                    self.column += 2;
                    return;
                }
                b'\n' => self.newline(),
                _ => {
                    self.advance();
                }
            }
        }

        tracing::debug!(line = open.line, col = open.column, "lexer error: unterminated block comment");
        self.errors.push((
            open,
            LexerError::UnterminatedComment { span: open.into() },
        ));
    }

    /// Advance to the next character and return it.
    /// Fast path for ASCII bytes (no UTF-8 decoding needed).
    #[inline]
    pub(crate) fn advance(&mut self) -> Option<char> {
        let b = *self.bytes.get(self.current)?;
        if b < UTF8_MULTIBYTE {
            self.current += 1;
            self.column += 1;
            Some(b as char)
        } else {
            let c = self.source[self.current..].chars().next()?;
            self.current += c.len_utf8();
            self.column += 1;
            Some(c)
        }
    }

    /// Peek at the next byte directly (for ASCII-only comparisons).
    #[inline]
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.current).copied()
    }

    /// Peek at the character after the next one
    pub(crate) fn peek_next(&self) -> Option<char> {
        let mut chars = self.source.get(self.current..)?.chars();
        chars.next()?;
        chars.next()
    }

    /// Consume the next character if it matches the expected byte.
    #[inline]
    pub(crate) fn match_byte(&mut self, expected: u8) -> bool {
        debug_assert!(expected < UTF8_MULTIBYTE, "match_byte only works for ASCII");
        if self.peek_byte() == Some(expected) {
            self.current += 1;
            self.column += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn start_span(&self) -> Span {
        Span::new(self.start, self.current, self.start_line, self.start_column)
    }

    /// Create a token from start to current position
    pub(crate) fn make_token(&self, ty: TokenType) -> Token {
        Token::new(ty, &self.source[self.start..self.current], self.start_span())
    }

    fn error_unexpected_char(&mut self, c: char) -> LexerError {
        tracing::debug!(char = %c, line = self.start_line, col = self.start_column, "lexer error: unexpected character");
        LexerError::UnexpectedCharacter {
            ch: c,
            span: self.start_span().into(),
        }
    }

    /// Scan an identifier or keyword.
    fn identifier(&mut self) -> Token {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.current += 1;
                self.column += 1;
            } else {
                break;
            }
        }

        let text = &self.source[self.start..self.current];
        let ty = TokenType::keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }
}
