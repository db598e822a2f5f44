// src/commands/inspect.rs

use std::process::ExitCode;

use super::common::{collect_files, compile_file, report_diagnostics};
use crate::cli::{ColorMode, InspectType, ReportFormat};
use crate::frontend::{AstPrinter, DiagnosticCollector, Lexer, SourceFile};

/// Dump the tokens or the AST of the given files
pub fn inspect_files(
    patterns: &[String],
    inspect_type: InspectType,
    locations: bool,
    color: ColorMode,
) -> ExitCode {
    let files = match collect_files(patterns, &[]) {
        Ok(files) => files,
        Err(code) => return code,
    };

    let mut had_error = false;

    for (i, path) in files.iter().enumerate() {
        // Print separator between files
        if i > 0 {
            println!();
        }

        // Print file header to stderr
        eprintln!("// {}", path.display());

        match inspect_type {
            InspectType::Tokens => {
                let source = match SourceFile::read(path) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("error: could not read '{}': {}", path.display(), e);
                        had_error = true;
                        continue;
                    }
                };

                let mut diag = DiagnosticCollector::new();
                let mut lexer = Lexer::with_file(source.text(), source.path().clone());
                let completed = lexer.lex(&mut diag);
                for token in lexer.tokens() {
                    println!("{}", token);
                }
                if !diag.is_empty() {
                    diag.print_all();
                }
                had_error |= !completed || diag.has_error();
            }
            InspectType::Ast => {
                let outcome = match compile_file(path) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        eprintln!("error: could not read '{}': {}", path.display(), e);
                        had_error = true;
                        continue;
                    }
                };

                report_diagnostics(&outcome, ReportFormat::Graphical, color);
                had_error |= outcome.failed();
                if let Some(parsed) = &outcome.parsed {
                    let printer = AstPrinter::new().with_locations(locations);
                    print!("{}", printer.print_file(parsed));
                }
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
