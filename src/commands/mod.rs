// src/commands/mod.rs
pub mod check;
pub mod common;
pub mod emit;
pub mod inspect;
pub mod version;
