#![deny(missing_docs)]

//! # hepsub-core: Foundational Types for the Submission Validator
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`
//! and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Shape-based document kinds.** A parsed submission document carries no
//!    type tag. [`classify`] derives a [`Kind`] once from the keys a mapping
//!    holds, and every consumer matches exhaustively on it.
//!
//! 2. **Splitting is pure.** The combined single-file encoding is separated
//!    into a table half and an entry half by [`split_combined`], which
//!    returns new values and leaves the input untouched.
//!
//! 3. **Diagnostics are data.** Validation never unwinds on a bad document;
//!    every finding becomes a [`Diagnostic`] in a [`DiagnosticLog`] keyed by
//!    the file it belongs to.
//!
//! 4. **[`CoreError`] hierarchy.** Structured errors with `thiserror`, no
//!    `.unwrap()` outside tests.

pub mod diagnostic;
pub mod document;
pub mod error;
pub mod severity;

// Re-export primary types at crate root for ergonomic imports.
pub use diagnostic::{Diagnostic, DiagnosticLog};
pub use document::{
    classify, split_combined, table_name, CombinedParts, Document, Kind, DATA_FILE,
    DEPENDENT_VARIABLES, DESCRIPTION, INDEPENDENT_VARIABLES, NAME,
};
pub use error::CoreError;
pub use severity::Severity;
