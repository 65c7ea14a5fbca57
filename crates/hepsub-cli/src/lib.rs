//! # hepsub-cli: Command-Line Validator
//!
//! Provides the `hepsub` command. It validates one submission bundle, a
//! directory holding `submission.yaml` or a single combined file, and prints
//! a per-file report.
//!
//! ```bash
//! hepsub path/to/submission
//! hepsub -l INFO path/to/submission/submission.yaml
//! hepsub --schema ./schemas --format json single.yaml
//! ```
//!
//! The exit status is 1 if any error was recorded anywhere in the bundle,
//! 0 otherwise. Warnings are printed but do not fail the run.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; validation logic lives in
//!   `hepsub-validate`.
//! - Report output goes to stdout, logging to stderr.

pub mod check;
pub mod config;
