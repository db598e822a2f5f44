// src/bin/neo.rs

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ColorChoice, CommandFactory, FromArgMatches};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::FormatTime;

use neo::cli::{Cli, Commands, split_src_dirs};
use neo::commands::check::{CheckOptions, check_files};
use neo::commands::emit::emit_files;
use neo::commands::inspect::inspect_files;
use neo::commands::version::print_version;

/// A timer that outputs nothing but still enables span timing calculation
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(
        &self,
        _w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        Ok(())
    }
}

fn main() -> ExitCode {
    init_tracing();

    // Pre-scan args to determine color choice for clap's help output
    let color_choice = get_color_choice_from_args();

    let styles = Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default());

    let cli = match Cli::from_arg_matches(
        &Cli::command()
            .styles(styles)
            .color(color_choice)
            .get_matches(),
    ) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match cli.command {
        Commands::Check {
            paths,
            src_dir,
            format,
            jobs,
        } => {
            let src_dirs = src_dir.as_deref().map(split_src_dirs).unwrap_or_default();
            check_files(
                &paths,
                &src_dirs,
                CheckOptions {
                    format,
                    jobs,
                    color: cli.color,
                },
            )
        }
        Commands::Inspect {
            inspect_type,
            files,
            locations,
        } => inspect_files(&files, inspect_type, locations, cli.color),
        Commands::Emit {
            paths,
            src_dir,
            out,
        } => {
            let src_dirs = src_dir.as_deref().map(split_src_dirs).unwrap_or_default();
            emit_files(&paths, &src_dirs, &out, cli.color)
        }
        Commands::Version => print_version(),
    }
}

/// Initialize tracing if NEO_LOG is set.
/// NEO_LOG_STYLE: "compact" (default) or "full" (verbose with timestamps)
fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_env("NEO_LOG") else {
        return;
    };

    let style = std::env::var("NEO_LOG_STYLE").unwrap_or_default();
    if style == "full" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // Compact output: no timestamp prefix, keep target/level and timing
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_timer(NoTimestamp)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
    }
    tracing::debug!("tracing initialized");
}

/// Pre-scan command line args to determine color choice before full parsing.
/// This allows clap's help output to respect the --color flag.
fn get_color_choice_from_args() -> ColorChoice {
    let args: Vec<String> = std::env::args().collect();

    for (i, arg) in args.iter().enumerate() {
        // Handle --color=value
        if let Some(value) = arg.strip_prefix("--color=") {
            return parse_color_choice(value);
        }
        // Handle --color value
        if arg == "--color"
            && let Some(value) = args.get(i + 1)
        {
            return parse_color_choice(value);
        }
    }

    // Default: use color if stdout is a TTY
    if is_stdout_tty() {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

fn parse_color_choice(value: &str) -> ColorChoice {
    match value.to_lowercase().as_str() {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Check if stdout is a TTY for auto color detection
fn is_stdout_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
