//! # Error Hierarchy
//!
//! Structured error types for the foundational layer, built with `thiserror`.
//! Validation findings are never errors here: they are diagnostics. The
//! variants below cover inputs that cannot be interpreted at all.

use thiserror::Error;

/// Errors raised while interpreting configuration-level inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A severity name other than `INFO`, `WARNING` or `ERROR`.
    #[error("unknown severity level: {0:?} (expected INFO, WARNING or ERROR)")]
    UnknownSeverity(String),

    /// A schema identifier other than `submission`, `data` or `additional-info`.
    #[error("unknown schema identifier: {0:?}")]
    UnknownSchema(String),
}
