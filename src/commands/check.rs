// src/commands/check.rs

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::common::{FileOutcome, TermColors, collect_files, compile_file, report_diagnostics};
use crate::cli::{ColorMode, ReportFormat};

/// Options shared by every file of one `neo check` run.
#[derive(Clone, Copy, Debug)]
pub struct CheckOptions {
    pub format: ReportFormat,
    pub jobs: usize,
    pub color: ColorMode,
}

/// Check Neo source files (lex + parse, no output besides diagnostics)
pub fn check_files(patterns: &[String], src_dirs: &[String], options: CheckOptions) -> ExitCode {
    let start = Instant::now();
    let files = match collect_files(patterns, src_dirs) {
        Ok(files) => files,
        Err(code) => return code,
    };

    let jobs = options.jobs.clamp(1, files.len());
    tracing::info!(files = files.len(), jobs, "checking");

    let mut failed = 0usize;
    if jobs == 1 {
        for path in &files {
            if !report_outcome(path, compile_file(path), options) {
                failed += 1;
            }
        }
    } else {
        for (path, result) in files.iter().zip(compile_parallel(&files, jobs)) {
            if !report_outcome(path, result, options) {
                failed += 1;
            }
        }
    }

    let secs = start.elapsed().as_secs_f64();
    tracing::info!("finished in {secs:.3}s");

    if failed > 0 {
        let colors = TermColors::for_stderr(options.color);
        eprintln!(
            "{}error{}: {} of {} files failed {}({:.2}s){}",
            colors.red(),
            colors.reset(),
            failed,
            files.len(),
            colors.dim(),
            secs,
            colors.reset()
        );
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Compile `files` on `jobs` scoped threads, returning results in input order.
fn compile_parallel(files: &[PathBuf], jobs: usize) -> Vec<io::Result<FileOutcome>> {
    let chunk_size = files.len().div_ceil(jobs);
    std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| compile_file(path))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}

/// Print what one file produced. Returns false when the file failed.
fn report_outcome(path: &Path, result: io::Result<FileOutcome>, options: CheckOptions) -> bool {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            return false;
        }
    };

    report_diagnostics(&outcome, options.format, options.color);
    let failed = outcome.failed();
    tracing::debug!(path = %path.display(), failed, "checked");
    !failed
}
