// src/errors/mod.rs
// Frontend errors (lexer, parser, codec)
pub mod codec;
pub mod lexer;
pub mod parser;

pub use codec::CodecError;
pub use lexer::LexerError;
pub use parser::ParserError;
