// src/parser/mod.rs

use std::fmt;
use std::sync::Arc;

use crate::ast::*;
use crate::cursor::TokenCursor;
use crate::diagnostics::DiagnosticCollector;
use crate::errors::ParserError;
use crate::lexer::Lexer;
use crate::source::SourceLoc;
use crate::token::{Span, Token, TokenType};

#[cfg(test)]
mod tests;

/// Return type of every grammar production.
pub type Expected<T> = Result<T, ParseError>;

/// Deepest nesting of statements, declarations and expressions accepted
/// before the parse fails.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A failed production: the typed error plus any notes appended while the
/// failure propagated.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self {
            error,
            span,
            notes: Vec::new(),
        }
    }

    /// Attach another message to this failure.
    pub fn append(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The primary message followed by every appended note.
    pub fn messages(&self) -> Vec<String> {
        std::iter::once(self.error.to_string())
            .chain(self.notes.iter().cloned())
            .collect()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        for note in &self.notes {
            write!(f, "\n{}", note)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over one file's tokens.
///
/// Productions are fail-fast: the first error is reported to the collector
/// at the current token and aborts every enclosing production. Nodes under
/// construction are plain locals, so a failed production drops them.
pub struct Parser<'d> {
    pub(crate) cursor: TokenCursor,
    pub(crate) file: Option<Arc<str>>,
    pub(crate) diag: &'d mut DiagnosticCollector,
    /// Current nesting level, bounded by [`MAX_NESTING_DEPTH`].
    pub(crate) depth: usize,
}

impl<'d> Parser<'d> {
    pub fn new(
        cursor: TokenCursor,
        file: Option<Arc<str>>,
        diag: &'d mut DiagnosticCollector,
    ) -> Self {
        Self {
            cursor,
            file,
            diag,
            depth: 0,
        }
    }

    /// Build a parser over an already lexed file.
    pub fn from_lexer(lexer: Lexer<'_>, diag: &'d mut DiagnosticCollector) -> Self {
        let file = lexer.file().cloned();
        Self::new(lexer.into_cursor(), file, diag)
    }

    /// Parse a whole file: imports and declarations until EOF.
    pub fn parse(&mut self) -> Expected<ParsedFile> {
        let _span = tracing::debug_span!("parse", file = self.file.as_deref().unwrap_or("<input>"))
            .entered();

        let mut nodes = Vec::new();
        while !self.cursor.is_at_end() {
            let node = if self.check(TokenType::KwImport) {
                Node::Stmt(Stmt::Import(self.import()?))
            } else {
                Node::Decl(self.declaration()?)
            };
            nodes.push(node);
        }

        tracing::debug!(nodes = nodes.len(), "parsed");
        Ok(ParsedFile {
            file: self.file.clone(),
            nodes,
        })
    }

    /// `import a.b.c;`
    pub(crate) fn import(&mut self) -> Expected<ImportStmt> {
        let loc = self.loc();
        self.advance(); // consume 'import'
        let module = self.module_path(&[TokenType::Semicolon])?;
        self.consume(TokenType::Semicolon, ";")?;
        Ok(ImportStmt { module, loc })
    }

    /// `module a.b;` followed by declarations to EOF, or `module a.b { ... }`.
    pub(crate) fn module_decl(&mut self) -> Expected<ModuleDecl> {
        let loc = self.loc();
        self.advance(); // consume 'module'
        let name = self.module_path(&[TokenType::Semicolon, TokenType::LBrace])?;

        let (scoped, body) = if self.match_token(TokenType::Semicolon) {
            (false, self.scope_decls(TokenType::Eof)?)
        } else {
            self.consume(TokenType::LBrace, "{")?;
            let body = self.scope_decls(TokenType::RBrace)?;
            self.consume(TokenType::RBrace, "}")?;
            (true, body)
        };

        Ok(ModuleDecl {
            name,
            scoped,
            body,
            meta: DeclMeta::default(),
            loc,
        })
    }

    /// Declarations up to (not including) `end` or EOF.
    pub(crate) fn scope_decls(&mut self, end: TokenType) -> Expected<TopLevelDecls> {
        let loc = self.loc();
        let mut decls = Vec::new();
        while !self.check(end) && !self.cursor.is_at_end() {
            decls.push(self.declaration()?);
        }
        Ok(TopLevelDecls { decls, loc })
    }

    /// Dotted module name made of identifiers and dots, ending before one of
    /// `terminators`.
    fn module_path(&mut self, terminators: &[TokenType]) -> Expected<String> {
        let mut path = String::new();
        while !terminators.contains(&self.current().ty) {
            match self.current().ty {
                TokenType::Identifier | TokenType::Dot => {
                    path.push_str(&self.current().lexeme);
                    self.advance();
                }
                _ => {
                    let found = self.current_text();
                    return Err(self.fail(ParserError::InvalidModuleName {
                        found,
                        span: self.current().span.into(),
                    }));
                }
            }
        }
        if path.is_empty() {
            let found = self.current_text();
            return Err(self.fail(ParserError::InvalidModuleName {
                found,
                span: self.current().span.into(),
            }));
        }
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Token helpers

    pub(crate) fn current(&self) -> &Token {
        self.cursor.current()
    }

    pub(crate) fn advance(&mut self) {
        self.cursor.next_token();
    }

    pub(crate) fn check(&self, ty: TokenType) -> bool {
        self.current().ty == ty
    }

    /// Consume the current token if it matches, otherwise return false
    pub(crate) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given type and return it, or fail.
    pub(crate) fn consume(&mut self, ty: TokenType, expected: &str) -> Expected<Token> {
        if self.check(ty) {
            let token = self.current().clone();
            self.advance();
            Ok(token)
        } else {
            let found = self.current_text();
            Err(self.fail(ParserError::ExpectedToken {
                expected: expected.to_string(),
                found,
                span: self.current().span.into(),
            }))
        }
    }

    pub(crate) fn consume_identifier(&mut self) -> Expected<String> {
        if self.check(TokenType::Identifier) {
            let name = self.current().lexeme.clone();
            self.advance();
            Ok(name)
        } else {
            let found = self.current_text();
            Err(self.fail(ParserError::ExpectedIdentifier {
                found,
                span: self.current().span.into(),
            }))
        }
    }

    /// Location of the current token.
    pub(crate) fn loc(&self) -> SourceLoc {
        let token = self.current();
        SourceLoc::new(token.line(), token.column(), self.file.clone())
    }

    /// How the current token is named in error messages.
    pub(crate) fn current_text(&self) -> String {
        let token = self.current();
        match token.ty {
            TokenType::Eof | TokenType::Unknown => token.ty.as_str().to_string(),
            _ => token.lexeme.clone(),
        }
    }

    /// Go one level deeper, failing once [`MAX_NESTING_DEPTH`] is reached.
    pub(crate) fn enter_nested(&mut self) -> Expected<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.fail(ParserError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: self.current().span.into(),
            }));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one level deeper. Levels entered inside `parse` are
    /// released when it returns.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Expected<T>,
    ) -> Expected<T> {
        let depth = self.depth;
        self.enter_nested()?;
        let result = parse(self);
        self.depth = depth;
        result
    }

    /// Report `error` at the current token and turn it into a failure.
    pub(crate) fn fail(&mut self, error: ParserError) -> ParseError {
        let loc = self.loc();
        let span = self.current().span;
        tracing::debug!(%loc, error = %error, "parse error");
        self.diag.report_diagnostic(loc, span, &error);
        ParseError::new(error, span)
    }

    /// Like [`Parser::fail`], with an extra note reported at the same place.
    pub(crate) fn fail_with_note(&mut self, error: ParserError, note: &str) -> ParseError {
        let failure = self.fail(error);
        let loc = self.loc();
        self.diag.note(loc, note);
        failure.append(note)
    }

    /// Report a non-fatal problem at the current token.
    pub(crate) fn warn(&mut self, error: ParserError) {
        let loc = self.loc();
        let span = self.current().span;
        self.diag.report_diagnostic(loc, span, &error);
    }
}

/// Lex and parse `source` in one go.
///
/// Returns `None` when lexing hit a fatal character or parsing failed; the
/// reasons are in `diag`.
pub fn parse_source(
    source: &str,
    file: Option<Arc<str>>,
    diag: &mut DiagnosticCollector,
) -> Option<ParsedFile> {
    let mut lexer = match file {
        Some(file) => Lexer::with_file(source, file),
        None => Lexer::new(source),
    };
    if !lexer.lex(diag) {
        return None;
    }
    Parser::from_lexer(lexer, diag).parse().ok()
}
