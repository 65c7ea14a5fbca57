//! # hepsub-validate: Submission Bundle Validation
//!
//! Checks a submission bundle, either a directory holding `submission.yaml`
//! plus one data file per table, or a single file in the combined encoding,
//! and records what it finds in a [`DiagnosticLog`](hepsub_core::DiagnosticLog).
//!
//! ## Flow
//!
//! [`BundleValidator::validate`] parses a location into its documents,
//! registers inline tables in the session's [`TableIndex`], then dispatches
//! every document on its [`Kind`](hepsub_core::Kind):
//!
//! - submission entries are schema-checked, their resources verified, and
//!   their `data_file` validated recursively unless the table is already
//!   known;
//! - data tables are schema-checked and their column lengths compared;
//! - combined entries are split and both halves validated in place;
//! - everything else is checked as additional information.
//!
//! Schema violations become `Error` diagnostics and never abort the rest of
//! the bundle. A location that cannot be read or parsed gets a single
//! `Error` and is skipped.
//!
//! ## Session state
//!
//! The [`Session`] (log, table index, visited locations) is an explicit
//! context threaded through the recursion by `&mut`. Independent bundles use
//! independent sessions.

pub mod bundle;
pub mod consistency;
pub mod report;
pub mod resources;
pub mod session;
pub mod source;
pub mod validator;

// Re-export primary types.
pub use bundle::{parse_documents, BundleError};
pub use report::{FileReport, Report};
pub use session::{Session, TableIndex};
pub use source::{BundleSource, LocalFiles};
pub use validator::{BundleValidator, SUBMISSION_FILE};
