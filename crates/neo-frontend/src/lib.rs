//! Neo frontend: lexer, parser, AST and diagnostics.

pub mod ast;
pub mod ast_display;
pub mod codec;
pub mod cursor;
pub mod diagnostics;
pub mod errors;
pub mod lexer;
mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parse_type;
pub mod parser;
pub mod source;
pub mod token;

pub use ast::{
    Attribute, BinaryExpr, BinaryOp, CallExpr, CastExpr, ClassDecl, CompoundStmt, Decl, DeclKind,
    DeclMeta, EnumDecl, Expr, ExprKind, ExprNode, ExprStmt, FieldDecl, ForStmt, ForeachStmt,
    FuncDecl, FuncKind, IfStmt, ImportStmt, InterfaceDecl, MemberAccessExpr, Modifier, Modifiers,
    ModuleDecl, NewExpr, Node, NodeCategory, NumericValue, ParsedFile, ReturnStmt, Stmt, StmtKind,
    StructDecl, TopLevelDecls, TypeExpr, TypeExprKind, TypeRef, UnaryExpr, UnaryOp, VarDecl,
    WhileStmt,
};
pub use ast_display::AstPrinter;
pub use codec::{Decoder, Encoder, MAX_DECODE_DEPTH, Persist};
pub use cursor::TokenCursor;
pub use diagnostics::{Diagnostic, DiagnosticCollector, Level, LevelMask};
pub use errors::{CodecError, LexerError, ParserError};
pub use lexer::Lexer;
pub use parser::{Expected, MAX_NESTING_DEPTH, ParseError, Parser, parse_source};
pub use source::{SourceFile, SourceLoc};
pub use token::{Span, Token, TokenType};
