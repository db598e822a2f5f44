// src/errors/parser.rs
//! Parser errors (E1xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("expected expression, found '{found}'")]
    #[diagnostic(code(E1001))]
    ExpectedExpression {
        found: String,
        #[label("expected expression")]
        span: SourceSpan,
    },

    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected token '{token}'")]
    #[diagnostic(code(E1003))]
    UnexpectedToken {
        token: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("expected type, found '{found}'")]
    #[diagnostic(code(E1004))]
    ExpectedType {
        found: String,
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected identifier, found '{found}'")]
    #[diagnostic(code(E1005))]
    ExpectedIdentifier {
        found: String,
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("unexpected token '{found}' in module name")]
    #[diagnostic(code(E1006), help("module names are dotted identifiers, e.g. 'std.io'"))]
    InvalidModuleName {
        found: String,
        #[label("not part of a module name")]
        span: SourceSpan,
    },

    #[error("expected declaration, found '{found}'")]
    #[diagnostic(code(E1007))]
    ExpectedDeclaration {
        found: String,
        #[label("expected declaration")]
        span: SourceSpan,
    },

    #[error("variable '{name}' is declared without a type hint or an initializer")]
    #[diagnostic(code(E1008), help("write 'var {name} : <type>' or 'var {name} = <value>'"))]
    UntypedVariable {
        name: String,
        #[label("needs a type or an initializer")]
        span: SourceSpan,
    },

    #[error("redefined destructor in class '{class}'")]
    #[diagnostic(code(E1009), help("a class may declare at most one destructor"))]
    RedefinedDestructor {
        class: String,
        #[label("second destructor")]
        span: SourceSpan,
    },

    #[error("{construct} are not supported yet")]
    #[diagnostic(code(E1010))]
    Unsupported {
        construct: &'static str,
        #[label("not supported")]
        span: SourceSpan,
    },

    #[error("{kind} declaration is not allowed here")]
    #[diagnostic(code(E1011))]
    MisplacedDeclaration {
        kind: &'static str,
        #[label("not allowed here")]
        span: SourceSpan,
    },

    #[error("integer literal '{literal}' is out of range")]
    #[diagnostic(code(E1012))]
    IntegerOutOfRange {
        literal: String,
        #[label("does not fit in 64 bits")]
        span: SourceSpan,
    },

    #[error("invalid number literal '{literal}'")]
    #[diagnostic(code(E1013))]
    InvalidNumber {
        literal: String,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("invalid assignment target")]
    #[diagnostic(code(E1014))]
    InvalidAssignmentTarget {
        #[label("cannot assign to this")]
        span: SourceSpan,
    },

    #[error("nesting is deeper than {limit} levels")]
    #[diagnostic(code(E1015), help("split the code into smaller functions or expressions"))]
    NestingTooDeep {
        limit: usize,
        #[label("too deeply nested")]
        span: SourceSpan,
    },

    #[error("duplicate modifier '{modifier}'")]
    #[diagnostic(code(W1001), severity(Warning))]
    DuplicateModifier {
        modifier: String,
        #[label("already specified")]
        span: SourceSpan,
    },
}
