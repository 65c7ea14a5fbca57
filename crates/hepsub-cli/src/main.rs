//! # hepsub CLI entry point
//!
//! Parses command-line arguments, initializes logging and runs the bundle
//! check.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hepsub_cli::check::{run_check, CheckArgs};

/// Validate a HEP submission bundle.
///
/// INPUT is either a bundle directory holding `submission.yaml` or a single
/// submission file. Data files referenced by the submission are validated
/// too, and a per-file report is printed.
#[derive(Parser, Debug)]
#[command(name = "hepsub", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(input = %cli.check.input.display(), "hepsub starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_check(&cli.check, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
