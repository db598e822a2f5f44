// src/commands/emit.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::common::{collect_files, compile_file, report_diagnostics};
use crate::cli::{ColorMode, ReportFormat};

/// Extension of persisted AST files.
pub const AST_EXTENSION: &str = "neoast";

/// Where the AST of `source` is written inside `out_dir`.
pub fn output_path(source: &Path, out_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "out".to_string());
    out_dir.join(format!("{stem}.{AST_EXTENSION}"))
}

/// Parse each file and persist its AST as `<stem>.neoast` in `out_dir`.
///
/// Files that fail to parse are reported and skipped; the command then exits
/// non-zero. Nothing is written for a failed file.
pub fn emit_files(
    patterns: &[String],
    src_dirs: &[String],
    out_dir: &Path,
    color: ColorMode,
) -> ExitCode {
    let files = match collect_files(patterns, src_dirs) {
        Ok(files) => files,
        Err(code) => return code,
    };

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("error: could not create '{}': {}", out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let mut had_error = false;
    for path in &files {
        let outcome = match compile_file(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("error: could not read '{}': {}", path.display(), e);
                had_error = true;
                continue;
            }
        };

        report_diagnostics(&outcome, ReportFormat::Graphical, color);
        let parsed = match &outcome.parsed {
            Some(parsed) if !outcome.failed() => parsed,
            _ => {
                had_error = true;
                continue;
            }
        };

        let target = output_path(path, out_dir);
        match parsed.save(&target) {
            Ok(()) => {
                tracing::info!(source = %path.display(), target = %target.display(), "emitted");
                println!("{} -> {}", path.display(), target.display());
            }
            Err(e) => {
                eprintln!("error: could not write '{}': {}", target.display(), e);
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_uses_file_stem() {
        let target = output_path(Path::new("src/lib/app.neo"), Path::new("out"));
        assert_eq!(target, Path::new("out").join("app.neoast"));
    }
}
