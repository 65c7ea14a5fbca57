//! # Bundle Check
//!
//! Validates one bundle and renders the session report.
//!
//! Text output is the per-file summary (at `INFO` level) followed, when
//! anything is wrong, by every diagnostic at `WARNING` or above and a closing
//! `There was a problem` line on errors.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Args, ValueEnum};
use hepsub_core::Severity;
use hepsub_schema::SchemaRegistry;
use hepsub_validate::report::{write_messages, write_summary};
use hepsub_validate::{BundleValidator, Report, Session};

use crate::config::resolve_schema_dir;

/// Report rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary and diagnostic listing.
    Text,
    /// One JSON document describing every file.
    Json,
}

/// Arguments for a bundle check.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Submission file or bundle directory.
    #[arg(value_name = "INPUT", default_value = "submission.yaml")]
    pub input: PathBuf,

    /// Level of output: INFO, WARNING or ERROR.
    #[arg(short, long, default_value = "WARNING")]
    pub level: Severity,

    /// Location of schema files.
    #[arg(short, long, value_name = "DIR")]
    pub schema: Option<PathBuf>,

    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Run a check and write the report to `out`.
///
/// Returns exit code: 0 if the bundle has no errors, 1 otherwise.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<u8> {
    let schema_dir = resolve_schema_dir(args.schema.as_deref())?;
    let schemas = SchemaRegistry::load(&schema_dir)
        .with_context(|| format!("failed to load schemas from {}", schema_dir.display()))?;
    tracing::info!(dir = %schema_dir.display(), "loaded schema registry");

    ensure!(
        args.input.exists(),
        "{} does not exist",
        args.input.display()
    );

    let session = BundleValidator::new(&schemas).run(&args.input);

    match args.format {
        OutputFormat::Text => write_text(out, &session, args.level)?,
        OutputFormat::Json => {
            let report = Report::from_log(&session.log, args.level);
            serde_json::to_writer_pretty(&mut *out, &report).context("failed to write report")?;
            writeln!(out)?;
        }
    }

    Ok(if session.is_valid() { 0 } else { 1 })
}

fn write_text(out: &mut impl Write, session: &Session, level: Severity) -> Result<()> {
    let log = &session.log;
    write_summary(out, log, level)?;

    let errors = log.has_errors(None);
    if errors || log.has_warnings(None) {
        write_messages(out, log, None, level.max(Severity::Warning))?;
    }
    if errors {
        writeln!(out, "There was a problem")?;
    }
    Ok(())
}
