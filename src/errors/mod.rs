// src/errors/mod.rs
pub mod report;

pub use neo_frontend::errors::{CodecError, LexerError, ParserError};
pub use report::{
    render_to_string, render_with, snapshot_handler, stderr_wants_color, terminal_handler,
};
