// src/errors/codec.rs
//! Errors from reading a persisted AST (E2xxx).

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CodecError {
    #[error("unexpected end of input: needed {needed} bytes at offset {offset}")]
    #[diagnostic(code(E2001))]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("invalid {what} tag {tag} at offset {offset}")]
    #[diagnostic(code(E2002))]
    InvalidTag {
        what: &'static str,
        tag: u8,
        offset: usize,
    },

    #[error("string at offset {offset} is not valid UTF-8")]
    #[diagnostic(code(E2003))]
    InvalidUtf8 { offset: usize },

    #[error("not a Neo AST file (bad magic)")]
    #[diagnostic(code(E2004))]
    BadMagic,

    #[error("unsupported AST format version {found} (expected {expected})")]
    #[diagnostic(code(E2005))]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("{count} trailing bytes after the last node")]
    #[diagnostic(code(E2006))]
    TrailingBytes { count: usize },

    #[error("nodes nested deeper than {limit} levels at offset {offset}")]
    #[diagnostic(code(E2008))]
    NestingTooDeep { offset: usize, limit: usize },

    #[error(transparent)]
    #[diagnostic(code(E2007))]
    Io(#[from] std::io::Error),
}
