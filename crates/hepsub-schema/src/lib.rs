//! # hepsub-schema: Schema Registry
//!
//! Holds the three externally supplied JSON Schemas a submission bundle is
//! checked against and validates parsed documents with the `jsonschema`
//! crate.
//!
//! ## Responsibilities
//!
//! - **Loading:** read `submission_schema.json`, `data_schema.json` and
//!   `additional_info_schema.json` from a directory. A missing or malformed
//!   schema is fatal at construction time, never per document.
//! - **`$ref` resolution:** references between the three schemas resolve
//!   locally; nothing is fetched from the network.
//! - **Validation:** a rejected document yields a [`SchemaViolation`] naming
//!   the violated field and carrying the offending fragment.

pub mod registry;

// Re-export primary types.
pub use registry::{SchemaError, SchemaKind, SchemaRegistry, SchemaViolation};
