//! # Diagnostics
//!
//! A [`Diagnostic`] is an immutable `(file, severity, message)` triple. The
//! [`DiagnosticLog`] groups them by file, preserving insertion order both
//! across files and within each file, so a report lists files in the order
//! the validator reached them.
//!
//! No operation on the log fails: every method is an in-memory query or
//! append.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// A single severity-tagged message attached to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The file the message belongs to.
    pub file: PathBuf,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(file: impl Into<PathBuf>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            severity,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:10} - {}", self.severity.label(), self.message)
    }
}

/// Per-file ordered collection of diagnostics for one validation session.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    /// Files in the order they were first touched.
    order: Vec<PathBuf>,
    /// Diagnostics per file, in insertion order.
    entries: HashMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file without adding a message, so it appears in reports
    /// even when nothing is ever recorded for it.
    pub fn touch(&mut self, file: impl AsRef<Path>) {
        self.slot(file.as_ref());
    }

    /// Append a diagnostic for `file`.
    pub fn add(&mut self, file: impl AsRef<Path>, severity: Severity, message: impl Into<String>) {
        let file = file.as_ref();
        let diagnostic = Diagnostic::new(file, severity, message);
        self.slot(file).push(diagnostic);
    }

    /// Append an `Info` diagnostic.
    pub fn info(&mut self, file: impl AsRef<Path>, message: impl Into<String>) {
        self.add(file, Severity::Info, message);
    }

    /// Append a `Warning` diagnostic.
    pub fn warning(&mut self, file: impl AsRef<Path>, message: impl Into<String>) {
        self.add(file, Severity::Warning, message);
    }

    /// Append an `Error` diagnostic.
    pub fn error(&mut self, file: impl AsRef<Path>, message: impl Into<String>) {
        self.add(file, Severity::Error, message);
    }

    /// Diagnostics recorded for `file`.
    ///
    /// With `least == None` every diagnostic is returned. Otherwise `exact`
    /// selects only that level, and a threshold filter returns the level and
    /// everything more severe.
    pub fn get(&self, file: &Path, least: Option<Severity>, exact: bool) -> Vec<&Diagnostic> {
        let Some(list) = self.entries.get(file) else {
            return Vec::new();
        };
        list.iter()
            .filter(|d| least.map_or(true, |l| d.severity.matches(l, exact)))
            .collect()
    }

    /// The same filter as [`get`](Self::get), applied to every touched file
    /// in insertion order.
    pub fn get_all(&self, least: Option<Severity>, exact: bool) -> Vec<(&Path, Vec<&Diagnostic>)> {
        self.order
            .iter()
            .map(|f| (f.as_path(), self.get(f, least, exact)))
            .collect()
    }

    /// Whether an `Error` was recorded for `file`, or for any file when
    /// `file` is `None`.
    pub fn has_errors(&self, file: Option<&Path>) -> bool {
        self.has_exact(file, Severity::Error)
    }

    /// Whether a `Warning` was recorded for `file`, or for any file when
    /// `file` is `None`.
    pub fn has_warnings(&self, file: Option<&Path>) -> bool {
        self.has_exact(file, Severity::Warning)
    }

    /// Number of diagnostics of exactly `severity` across all files.
    pub fn count(&self, severity: Severity) -> usize {
        self.iter().filter(|d| d.severity == severity).count()
    }

    /// Touched files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.order.iter().map(PathBuf::as_path)
    }

    /// Whether `file` has been touched.
    pub fn contains(&self, file: &Path) -> bool {
        self.entries.contains_key(file)
    }

    /// Every diagnostic, grouped by file in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.order
            .iter()
            .filter_map(|f| self.entries.get(f))
            .flat_map(|list| list.iter())
    }

    /// Total number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if no diagnostic has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every file and diagnostic.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    fn has_exact(&self, file: Option<&Path>, severity: Severity) -> bool {
        match file {
            Some(file) => self
                .entries
                .get(file)
                .is_some_and(|list| list.iter().any(|d| d.severity == severity)),
            None => self.iter().any(|d| d.severity == severity),
        }
    }

    fn slot(&mut self, file: &Path) -> &mut Vec<Diagnostic> {
        if !self.entries.contains_key(file) {
            self.order.push(file.to_path_buf());
        }
        self.entries.entry(file.to_path_buf()).or_default()
    }
}
