// src/cli/mod.rs
pub mod args;
pub mod paths;

pub use args::{Cli, ColorMode, Commands, InspectType, ReportFormat};
pub use paths::{PathError, SOURCE_EXTENSION, expand_paths, split_src_dirs};
