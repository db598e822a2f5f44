// src/commands/common.rs
//! Shared utilities for CLI commands.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use miette::NamedSource;

use crate::cli::{ColorMode, ReportFormat, SOURCE_EXTENSION, expand_paths};
use crate::errors::{render_with, stderr_wants_color};
use crate::frontend::{DiagnosticCollector, Lexer, ParsedFile, Parser, SourceFile};

/// Result of lexing and parsing one source file.
pub struct FileOutcome {
    pub path: PathBuf,
    pub source: SourceFile,
    pub diagnostics: DiagnosticCollector,
    /// `None` when lexing hit a fatal character or parsing failed.
    pub parsed: Option<ParsedFile>,
}

impl FileOutcome {
    /// A file fails when it did not parse or reported any error.
    /// Warnings and notes alone never fail a file.
    pub fn failed(&self) -> bool {
        self.parsed.is_none() || self.diagnostics.has_error()
    }
}

/// Read, lex and parse one file.
pub fn compile_file(path: &Path) -> io::Result<FileOutcome> {
    let start = Instant::now();
    let source = SourceFile::read(path)?;
    let mut diagnostics = DiagnosticCollector::new();

    let mut lexer = Lexer::with_file(source.text(), source.path().clone());
    let parsed = if lexer.lex(&mut diagnostics) {
        Parser::from_lexer(lexer, &mut diagnostics).parse().ok()
    } else {
        None
    };

    tracing::debug!(
        path = %path.display(),
        diagnostics = diagnostics.len(),
        ok = parsed.is_some(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "compiled file"
    );

    Ok(FileOutcome {
        path: path.to_path_buf(),
        source,
        diagnostics,
        parsed,
    })
}

/// Expand CLI patterns plus `--src-dir` entries into the files to process.
///
/// Prints the error and returns `Err(ExitCode::FAILURE)` when expansion fails
/// or nothing matched.
pub fn collect_files(patterns: &[String], src_dirs: &[String]) -> Result<Vec<PathBuf>, ExitCode> {
    let all: Vec<String> = patterns.iter().chain(src_dirs).cloned().collect();
    let files = match expand_paths(&all) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    if files.is_empty() {
        eprintln!("error: no .{} files found", SOURCE_EXTENSION);
        return Err(ExitCode::FAILURE);
    }

    Ok(files)
}

/// Write the diagnostics of `outcome` in the requested format.
pub fn write_diagnostics<W: Write>(
    outcome: &FileOutcome,
    format: ReportFormat,
    color: bool,
    out: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Short => outcome.diagnostics.write_all(out),
        ReportFormat::Graphical => {
            let name = outcome.path.to_string_lossy().to_string();
            for diagnostic in outcome.diagnostics.iter() {
                let report = miette::Report::new(diagnostic.clone()).with_source_code(
                    NamedSource::new(&name, outcome.source.text().to_string()),
                );
                write!(out, "{}", render_with(report.as_ref(), color))?;
            }
            Ok(())
        }
    }
}

/// Print the diagnostics of `outcome` to stderr.
pub fn report_diagnostics(outcome: &FileOutcome, format: ReportFormat, color_mode: ColorMode) {
    if outcome.diagnostics.is_empty() {
        return;
    }
    let color = stderr_wants_color(color_mode);
    let stderr = io::stderr();
    let mut lock = stderr.lock();
    // Nothing sensible to do if stderr is gone.
    let _ = write_diagnostics(outcome, format, color, &mut lock);
}

/// ANSI color codes for terminal output.
pub struct TermColors {
    use_color: bool,
}

impl TermColors {
    /// Colors for stderr, honoring `--color`.
    pub fn for_stderr(mode: ColorMode) -> Self {
        Self {
            use_color: stderr_wants_color(mode),
        }
    }

    /// Colors for stdout, honoring `--color`.
    pub fn for_stdout(mode: ColorMode) -> Self {
        let use_color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal(),
        };
        Self { use_color }
    }

    /// Green text (for success).
    pub fn green(&self) -> &'static str {
        if self.use_color { "\x1b[32m" } else { "" }
    }

    /// Red text (for errors/failures).
    pub fn red(&self) -> &'static str {
        if self.use_color { "\x1b[31m" } else { "" }
    }

    /// Dim/gray text (for secondary info like timing).
    pub fn dim(&self) -> &'static str {
        if self.use_color { "\x1b[90m" } else { "" }
    }

    /// Reset to default colors.
    pub fn reset(&self) -> &'static str {
        if self.use_color { "\x1b[0m" } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn compile_clean_file() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "ok.neo", "module m; var x : int = 1;");

        let outcome = compile_file(&path).unwrap();
        assert!(!outcome.failed());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.parsed.unwrap().nodes.len(), 1);
    }

    #[test]
    fn warnings_do_not_fail_a_file() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "warn.neo", "static static var x = 1;");

        let outcome = compile_file(&path).unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(!outcome.failed());
    }

    #[test]
    fn short_format_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "bad.neo", "var x;");

        let outcome = compile_file(&path).unwrap();
        assert!(outcome.failed());

        let mut out = Vec::new();
        write_diagnostics(&outcome, ReportFormat::Short, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "{}:1:6 | variable 'x' is declared without a type hint or an initializer\n",
            path.to_string_lossy()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn graphical_format_quotes_source() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "bad.neo", "var x;");

        let outcome = compile_file(&path).unwrap();
        let mut out = Vec::new();
        write_diagnostics(&outcome, ReportFormat::Graphical, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("var x;"), "output: {text}");
        assert!(text.contains("bad.neo"), "output: {text}");
    }

    #[test]
    fn fatal_lex_error_has_no_tree() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "lex.neo", "var x : int = 1; @");

        let outcome = compile_file(&path).unwrap();
        assert!(outcome.parsed.is_none());
        assert!(outcome.failed());
    }

    #[test]
    fn collect_files_merges_src_dirs() {
        let dir = TempDir::new().unwrap();
        write_source(&dir, "a.neo", "");
        let extra = TempDir::new().unwrap();
        write_source(&extra, "b.neo", "");

        let files = collect_files(
            &[dir.path().to_string_lossy().to_string()],
            &[extra.path().to_string_lossy().to_string()],
        )
        .unwrap();
        assert_eq!(files.len(), 2);
    }
}
