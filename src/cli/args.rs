// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands::version::version_string;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// How diagnostics are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Source snippets with labels
    #[default]
    Graphical,
    /// One `<file>:<line>:<col> | <message>` line per diagnostic
    Short,
}

/// What `inspect` dumps
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InspectType {
    /// The token stream, one `{ Kind : lexeme }` per line
    Tokens,
    /// The parsed declarations as an indented tree
    Ast,
}

/// Neo language frontend
#[derive(Parser)]
#[command(name = "neo")]
#[command(version = version_string())]
#[command(about = "Neo programming language frontend", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lex and parse Neo source files, reporting diagnostics
    #[command(visible_alias = "c")]
    Check {
        /// Paths to check (files, directories, or glob patterns)
        #[arg(value_name = "PATHS", required_unless_present = "src_dir")]
        paths: Vec<String>,

        /// Source directories, separated by ';'
        #[arg(long, value_name = "DIRS")]
        src_dir: Option<String>,

        /// Diagnostic format: graphical, short
        #[arg(long, value_enum, default_value_t = ReportFormat::Graphical)]
        format: ReportFormat,

        /// Number of files checked in parallel
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
    },
    /// Dump the tokens or AST of Neo source files
    #[command(visible_alias = "i")]
    Inspect {
        /// What to inspect: tokens, ast
        #[arg(value_name = "TYPE")]
        inspect_type: InspectType,

        /// Paths to inspect (files or glob patterns)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<String>,

        /// Append `@ line:col` to every AST node
        #[arg(long)]
        locations: bool,
    },
    /// Parse Neo source files and write their ASTs in binary form
    #[command(visible_alias = "e")]
    Emit {
        /// Paths to emit (files, directories, or glob patterns)
        #[arg(value_name = "PATHS", required_unless_present = "src_dir")]
        paths: Vec<String>,

        /// Source directories, separated by ';'
        #[arg(long, value_name = "DIRS")]
        src_dir: Option<String>,

        /// Output directory for `.neoast` files
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_with_options() {
        let cli = Cli::try_parse_from([
            "neo", "--color", "never", "check", "a.neo", "src", "--format", "short", "-j", "4",
        ])
        .unwrap();
        assert_eq!(cli.color, ColorMode::Never);
        match cli.command {
            Commands::Check {
                paths,
                src_dir,
                format,
                jobs,
            } => {
                assert_eq!(paths, vec!["a.neo", "src"]);
                assert!(src_dir.is_none());
                assert_eq!(format, ReportFormat::Short);
                assert_eq!(jobs, 4);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn check_accepts_src_dir_alone() {
        let cli = Cli::try_parse_from(["neo", "check", "--src-dir", "a;b"]).unwrap();
        match cli.command {
            Commands::Check { paths, src_dir, .. } => {
                assert!(paths.is_empty());
                assert_eq!(src_dir.as_deref(), Some("a;b"));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn check_requires_some_input() {
        assert!(Cli::try_parse_from(["neo", "check"]).is_err());
    }

    #[test]
    fn parse_inspect_tokens() {
        let cli = Cli::try_parse_from(["neo", "i", "tokens", "x.neo"]).unwrap();
        match cli.command {
            Commands::Inspect {
                inspect_type,
                files,
                locations,
            } => {
                assert_eq!(inspect_type, InspectType::Tokens);
                assert_eq!(files, vec!["x.neo"]);
                assert!(!locations);
            }
            _ => panic!("expected inspect"),
        }
    }
}
