//! # Configuration
//!
//! Locates the schema directory. The first match wins:
//!
//! 1. the `--schema` flag;
//! 2. the `HEPSUB_SCHEMA_DIR` environment variable;
//! 3. a `schemas/` directory holding `submission_schema.json`, found by
//!    walking up from the current directory;
//! 4. the `schemas/` directory of the source tree the binary was built from.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use hepsub_schema::SchemaKind;

/// Environment variable naming the schema directory.
pub const SCHEMA_DIR_ENV: &str = "HEPSUB_SCHEMA_DIR";

/// Name of the schema directory looked for when walking up.
const SCHEMA_DIR_NAME: &str = "schemas";

/// Schema directory of the source tree, used when nothing else is found.
const BUILT_IN_SCHEMA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas");

/// Resolve the schema directory from the flag, environment or filesystem.
pub fn resolve_schema_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        ensure!(dir.is_dir(), "{} is not a directory", dir.display());
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = std::env::var_os(SCHEMA_DIR_ENV) {
        let dir = PathBuf::from(dir);
        tracing::debug!(dir = %dir.display(), "schema directory from {SCHEMA_DIR_ENV}");
        return Ok(dir);
    }

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    if let Some(dir) = find_schema_dir(&cwd) {
        tracing::debug!(dir = %dir.display(), "found schema directory");
        return Ok(dir);
    }

    let built_in = PathBuf::from(BUILT_IN_SCHEMA_DIR);
    ensure!(
        is_schema_dir(&built_in),
        "no schema directory found; pass --schema or set {SCHEMA_DIR_ENV}"
    );
    Ok(built_in)
}

/// Walk up from `start` to the first `schemas/` directory holding the
/// submission schema.
pub fn find_schema_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(SCHEMA_DIR_NAME))
        .find(|candidate| is_schema_dir(candidate))
}

fn is_schema_dir(dir: &Path) -> bool {
    dir.join(SchemaKind::Submission.filename()).is_file()
}
