//! # Validation Session
//!
//! State shared by every recursive [`validate`](crate::BundleValidator::validate)
//! call of one top-level run: the diagnostic log, the table index, and the
//! locations already visited.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use hepsub_core::DiagnosticLog;
use serde_json::Value;

/// Tables found inline in a bundle, keyed by name.
///
/// The first registration of a name wins; later documents with the same
/// name are ignored.
#[derive(Debug, Default, Clone)]
pub struct TableIndex {
    tables: HashMap<String, Value>,
}

impl TableIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `doc` under `name`. Returns false if the name was taken.
    pub fn register(&mut self, name: &str, doc: Value) -> bool {
        if self.tables.contains_key(name) {
            return false;
        }
        self.tables.insert(name.to_string(), doc);
        true
    }

    /// Whether a table named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// The registered table named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.tables.get(name)
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Mutable context of one validation run.
#[derive(Debug, Default)]
pub struct Session {
    /// Diagnostics recorded so far.
    pub log: DiagnosticLog,
    /// Tables found inline so far.
    pub tables: TableIndex,
    visited: HashSet<PathBuf>,
}

impl Session {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `location` as visited. Returns false if it already was.
    ///
    /// Locations are compared after [`clean_path`].
    pub fn mark_visited(&mut self, location: &Path) -> bool {
        self.visited.insert(clean_path(location))
    }

    /// Whether `location` has been visited.
    pub fn was_visited(&self, location: &Path) -> bool {
        self.visited.contains(&clean_path(location))
    }

    /// True if no `Error` was recorded for any file.
    pub fn is_valid(&self) -> bool {
        !self.log.has_errors(None)
    }
}

/// Lexically drop `.` components from `path`. `..` is kept, since
/// resolving it needs the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
