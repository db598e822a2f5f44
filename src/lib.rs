// src/lib.rs
pub mod cli;
pub mod commands;
pub mod errors;

pub use neo_frontend as frontend;
