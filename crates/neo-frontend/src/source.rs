// src/source.rs
//! Source files and the locations attached to tokens, nodes and diagnostics.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Name rendered for locations that are not tied to a file.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// A 1-based line/column position in a (possibly unnamed) source file.
///
/// The file is shared, not owned: every location produced while lexing one
/// file points at the same `Arc<str>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SourceLoc {
    pub line: u32,
    pub column: u32,
    pub file: Option<Arc<str>>,
}

impl SourceLoc {
    pub fn new(line: u32, column: u32, file: Option<Arc<str>>) -> Self {
        Self { line, column, file }
    }

    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name(), self.line, self.column)
    }
}

/// The full text of one source file, read up front.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: Arc<str>,
    text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_string_lossy().as_ref(), text))
    }

    pub fn path(&self) -> &Arc<str> {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
