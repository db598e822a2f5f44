// src/diagnostics.rs
//! The diagnostic log shared by the lexer, the parser and the driver.

use std::fmt;
use std::io::{self, Write};
use std::ops::BitOr;

use miette::{LabeledSpan, Severity};
use thiserror::Error;

use crate::source::SourceLoc;
use crate::token::Span;

/// Severity of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        }
    }

    pub fn mask(self) -> LevelMask {
        match self {
            Level::Error => LevelMask::ERROR,
            Level::Warning => LevelMask::WARNING,
            Level::Note => LevelMask::NOTE,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of levels, used to select diagnostics for [`DiagnosticCollector::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LevelMask(u8);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const ERROR: LevelMask = LevelMask(1);
    pub const WARNING: LevelMask = LevelMask(2);
    pub const NOTE: LevelMask = LevelMask(4);

    pub fn contains(self, level: Level) -> bool {
        self.0 & level.mask().0 != 0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

/// A leveled, located compiler message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub level: Level,
    pub loc: SourceLoc,
    pub message: String,
    /// Byte range in the source, when the reporter knows it.
    pub span: Option<Span>,
    pub code: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(level: Level, loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            level,
            loc,
            message: message.into(),
            span: None,
            code: None,
            help: None,
        }
    }

    /// The single-line form: `<file>:<line>:<col> | <message>`.
    pub fn render_line(&self) -> String {
        format!("{} | {}", self.loc, self.message)
    }
}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
            Level::Note => Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(Some(self.level.to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Append-only log of diagnostics for one compilation unit.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, level: Level, loc: SourceLoc, message: impl Into<String>) {
        self.push(Diagnostic::new(level, loc, message));
    }

    pub fn error(&mut self, loc: SourceLoc, message: impl Into<String>) {
        self.report(Level::Error, loc, message);
    }

    pub fn warning(&mut self, loc: SourceLoc, message: impl Into<String>) {
        self.report(Level::Warning, loc, message);
    }

    pub fn note(&mut self, loc: SourceLoc, message: impl Into<String>) {
        self.report(Level::Note, loc, message);
    }

    /// Record a typed frontend error, keeping its code, help text and span.
    /// The level follows the error's miette severity (errors by default).
    pub fn report_diagnostic(
        &mut self,
        loc: SourceLoc,
        span: Span,
        error: &dyn miette::Diagnostic,
    ) {
        let level = match error.severity() {
            Some(Severity::Warning) => Level::Warning,
            Some(Severity::Advice) => Level::Note,
            Some(Severity::Error) | None => Level::Error,
        };
        self.push(Diagnostic {
            level,
            loc,
            message: error.to_string(),
            span: Some(span),
            code: error.code().map(|code| code.to_string()),
            help: error.help().map(|help| help.to_string()),
        });
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(level = %diagnostic.level, loc = %diagnostic.loc, message = %diagnostic.message, "diagnostic reported");
        if diagnostic.level == Level::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_error(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Every diagnostic in insertion order, one rendered line each.
    pub fn render_lines(&self) -> Vec<String> {
        self.diagnostics.iter().map(Diagnostic::render_line).collect()
    }

    pub fn write_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{}", diagnostic.render_line())?;
        }
        Ok(())
    }

    /// Print every diagnostic to stderr.
    pub fn print_all(&self) {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        // Nothing sensible to do if stderr is gone.
        let _ = self.write_all(&mut lock);
    }

    /// Remove every diagnostic (`LevelMask::NONE`) or only those whose level
    /// is in `mask`.
    pub fn clear(&mut self, mask: LevelMask) {
        if mask.is_none() {
            self.diagnostics.clear();
        } else {
            self.diagnostics.retain(|d| !mask.contains(d.level));
        }
        self.error_count = self
            .diagnostics
            .iter()
            .filter(|d| d.level == Level::Error)
            .count();
    }

    /// Move all diagnostics from `other` into `self`, preserving order.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        for diagnostic in other.diagnostics {
            self.push(diagnostic);
        }
    }
}
