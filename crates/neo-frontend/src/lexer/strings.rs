// src/lexer/strings.rs
//
// String and character literal lexing.

use crate::errors::LexerError;
use crate::{Span, Token, TokenType};

use super::Lexer;

impl<'src> Lexer<'src> {
    /// Scan a string literal after the opening quote.
    ///
    /// Escapes are copied verbatim, not decoded. A newline or the end of
    /// input before the closing quote is reported and the partial literal is
    /// still returned.
    pub(super) fn string(&mut self) -> Token {
        let content_start = self.current;

        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    let span = self.start_span();
                    tracing::debug!(line = span.line, col = span.column, "lexer error: unterminated string");
                    self.errors
                        .push((span, LexerError::UnterminatedString { span: span.into() }));
                    let content = &self.source[content_start..self.current];
                    return Token::new(TokenType::StringLiteral, content, span);
                }
                Some(b'"') => {
                    let content = &self.source[content_start..self.current];
                    self.current += 1;
                    self.column += 1;
                    return Token::new(TokenType::StringLiteral, content, self.start_span());
                }
                Some(b'\\') => {
                    self.advance();
                    if self.peek_byte().is_some_and(|b| b != b'\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a character literal after the opening quote.
    ///
    /// Returns `None` for a malformed literal; the error is recorded and
    /// scanning resumes right after the opening quote.
    pub(super) fn char_literal(&mut self) -> Option<Token> {
        let resume = (self.current, self.line, self.column);
        let content_start = self.current;

        let well_formed = match self.advance() {
            Some('\\') => self.advance().is_some_and(|c| c != '\n'),
            Some(c) => c != '\'' && c != '\n',
            None => false,
        };

        if well_formed && self.match_byte(b'\'') {
            let content = &self.source[content_start..self.current - 1];
            return Some(Token::new(TokenType::CharLiteral, content, self.start_span()));
        }

        let span = Span::new(self.start, resume.0, self.start_line, self.start_column);
        tracing::debug!(line = span.line, col = span.column, "lexer error: malformed char literal");
        self.errors
            .push((span, LexerError::MalformedChar { span: span.into() }));
        (self.current, self.line, self.column) = resume;
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::DiagnosticCollector;
    use crate::{Lexer, Token, TokenType};

    fn lex(source: &str) -> (Vec<Token>, DiagnosticCollector) {
        let mut diag = DiagnosticCollector::new();
        let mut lexer = Lexer::new(source);
        assert!(lexer.lex(&mut diag));
        (lexer.tokens().to_vec(), diag)
    }

    #[test]
    fn escaped_quote_is_preserved() {
        let (tokens, diag) = lex(r#""abc\"def""#);
        assert!(diag.is_empty());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].ty, TokenType::StringLiteral);
        assert_eq!(tokens[0].lexeme, r#"abc\"def"#);
    }

    #[test]
    fn string_span_includes_quotes() {
        let (tokens, _) = lex(r#"x = "hi";"#);
        let string = &tokens[2];
        assert_eq!(string.lexeme, "hi");
        assert_eq!(string.span.len(), 4);
        assert_eq!(string.column(), 5);
    }

    #[test]
    fn unterminated_string_at_newline_still_emits_token() {
        let (tokens, diag) = lex("\"abc\nvar");
        assert_eq!(diag.error_count(), 1);
        assert_eq!(tokens[0].ty, TokenType::StringLiteral);
        assert_eq!(tokens[0].lexeme, "abc");
        assert_eq!(tokens[1].ty, TokenType::KwVar);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn unterminated_string_at_eof_still_emits_token() {
        let (tokens, diag) = lex("\"abc");
        assert_eq!(diag.error_count(), 1);
        assert_eq!(tokens[0].lexeme, "abc");
        assert_eq!(tokens[1].ty, TokenType::Eof);
    }

    #[test]
    fn char_literals() {
        let (tokens, diag) = lex(r"'a' '\n'");
        assert!(diag.is_empty());
        assert_eq!(tokens[0].ty, TokenType::CharLiteral);
        assert_eq!(tokens[0].lexeme, "a");
        assert_eq!(tokens[1].lexeme, r"\n");
    }

    #[test]
    fn malformed_char_resumes_after_quote() {
        let (tokens, diag) = lex("'ab' x");
        // Both quotes are malformed literals
        assert_eq!(diag.error_count(), 2);
        let kinds: Vec<_> = tokens.iter().map(|t| t.ty).collect();
        assert_eq!(
            kinds,
            vec![TokenType::Identifier, TokenType::Identifier, TokenType::Eof]
        );
        assert_eq!(tokens[0].lexeme, "ab");
    }
}
