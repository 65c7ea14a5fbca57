//! # Bundle Validator
//!
//! Validates a bundle location by location, depth-first.
//!
//! ## Algorithm
//!
//! 1. Parse the location into its non-null documents. A location that
//!    cannot be read or parsed gets one `Error` and is not processed further.
//! 2. Pre-scan: every document carrying a variable array and a `name` is
//!    registered in the session's [`TableIndex`]. This runs before the main
//!    pass so an entry can find a table that appears later in the stream.
//! 3. Main pass: each document is validated according to its [`Kind`]. A
//!    schema violation becomes one `Error` for that document and the pass
//!    moves on to the next one.
//!
//! A submission entry whose table is not in the index has its `data_file`
//! resolved against the directory of the current location and validated
//! recursively, with diagnostics recorded under the data file's path. A
//! table already in the index is never loaded from file, even when the entry
//! names a non-empty `data_file`.

use std::path::{Path, PathBuf};

use hepsub_core::{classify, split_combined, table_name, Kind, DATA_FILE, NAME};
use hepsub_schema::{SchemaKind, SchemaRegistry, SchemaViolation};
use serde_json::Value;

use crate::bundle::{parse_documents, BundleError};
use crate::consistency::check_table;
use crate::resources::{check_resources, has_separator};
use crate::session::{clean_path, Session};
use crate::source::{BundleSource, LocalFiles};

/// File validated when the input is a directory.
pub const SUBMISSION_FILE: &str = "submission.yaml";

/// How a submission entry reaches its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableRef {
    /// Look the table up in the index, loading `data_file` if absent.
    Resolve,
    /// The table was validated inline next to the entry.
    Inline,
}

/// Validates submission bundles against a [`SchemaRegistry`].
#[derive(Debug)]
pub struct BundleValidator<'a, S = LocalFiles> {
    schemas: &'a SchemaRegistry,
    source: S,
}

impl<'a> BundleValidator<'a, LocalFiles> {
    /// Create a validator reading from the local filesystem.
    pub fn new(schemas: &'a SchemaRegistry) -> Self {
        Self::with_source(schemas, LocalFiles)
    }
}

impl<'a, S: BundleSource> BundleValidator<'a, S> {
    /// Create a validator reading bundle files through `source`.
    pub fn with_source(schemas: &'a SchemaRegistry, source: S) -> Self {
        Self { schemas, source }
    }

    /// The file source in use.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validate the bundle at `input` in a fresh [`Session`].
    ///
    /// A directory is validated through its `submission.yaml`. The overall
    /// verdict is [`Session::is_valid`].
    pub fn run(&self, input: &Path) -> Session {
        let mut session = Session::new();
        let location = entry_point(input);
        tracing::info!(file = %location.display(), "validating bundle");
        self.validate(&mut session, &location, None);
        session
    }

    /// Validate one location, recording diagnostics in `session`.
    ///
    /// `data` supplies already-parsed documents for `location`; when `None`
    /// the file is read through the source. Returns true if no `Error` was
    /// recorded for `location` itself. Errors in referenced data files are
    /// recorded under their own paths; use [`Session::is_valid`] for the
    /// aggregate.
    pub fn validate(&self, session: &mut Session, location: &Path, data: Option<Vec<Value>>) -> bool {
        let location = &clean_path(location);
        if !session.mark_visited(location) {
            tracing::debug!(file = %location.display(), "already validated");
            return !session.log.has_errors(Some(location));
        }
        session.log.touch(location);

        let documents = match data {
            Some(documents) => documents.into_iter().filter(|d| !d.is_null()).collect(),
            None => match self.load(location) {
                Ok(documents) => documents,
                Err(e) => {
                    tracing::warn!(file = %location.display(), error = %e, "cannot load bundle file");
                    session.log.error(location, e.to_string());
                    return false;
                }
            },
        };
        tracing::debug!(
            file = %location.display(),
            documents = documents.len(),
            "parsed bundle file"
        );

        for doc in &documents {
            if let Some(name) = table_name(doc) {
                if session.tables.register(name, doc.clone()) {
                    tracing::debug!(file = %location.display(), table = name, "found inline data table");
                }
            }
        }

        for doc in &documents {
            if let Err(violation) = self.validate_document(session, location, doc) {
                tracing::debug!(file = %location.display(), %violation, "schema violation");
                session.log.error(location, violation_message(&violation));
            }
        }

        !session.log.has_errors(Some(location))
    }

    fn load(&self, location: &Path) -> Result<Vec<Value>, BundleError> {
        let content = self
            .source
            .read_to_string(location)
            .map_err(|e| BundleError::Read {
                path: location.display().to_string(),
                source: e,
            })?;
        parse_documents(location, &content)
    }

    fn validate_document(
        &self,
        session: &mut Session,
        location: &Path,
        doc: &Value,
    ) -> Result<(), SchemaViolation> {
        match classify(doc) {
            Kind::SubmissionEntry => self.validate_entry(session, location, doc, TableRef::Resolve),
            Kind::DataTable => self.validate_table(session, location, doc),
            Kind::CombinedEntry => {
                let Some(parts) = split_combined(doc) else {
                    return Ok(());
                };
                self.validate_table(session, location, &parts.table)?;
                self.validate_entry(session, location, &parts.entry, TableRef::Inline)
            }
            Kind::AdditionalInfo => self.validate_additional(session, location, doc),
        }
    }

    fn validate_entry(
        &self,
        session: &mut Session,
        location: &Path,
        doc: &Value,
        table: TableRef,
    ) -> Result<(), SchemaViolation> {
        let name = doc.get(NAME).and_then(Value::as_str).unwrap_or_default();
        tracing::debug!(file = %location.display(), table = name, "validating submission entry");

        self.schemas.validate(SchemaKind::Submission, doc)?;
        check_resources(&mut session.log, &self.source, location, doc);

        if table == TableRef::Resolve && !session.tables.contains(name) {
            let data_file = doc.get(DATA_FILE).and_then(Value::as_str).unwrap_or_default();
            if has_separator(data_file) {
                session.log.warning(
                    location,
                    format!("Data file names should not contain \"/\": {data_file}"),
                );
            }
            let resolved = base_dir(location).join(data_file);
            self.validate(session, &resolved, None);
        }

        session
            .log
            .info(location, format!("Contains the valid submission {name}"));
        Ok(())
    }

    fn validate_table(
        &self,
        session: &mut Session,
        location: &Path,
        doc: &Value,
    ) -> Result<(), SchemaViolation> {
        let name = doc.get(NAME).and_then(Value::as_str);
        tracing::debug!(file = %location.display(), table = name, "validating data table");

        self.schemas.validate(SchemaKind::Data, doc)?;
        check_table(&mut session.log, location, doc);

        let message = match name {
            Some(name) => format!("Contains a valid data table {name}"),
            None => "Contains a valid data table".to_string(),
        };
        session.log.info(location, message);
        Ok(())
    }

    fn validate_additional(
        &self,
        session: &mut Session,
        location: &Path,
        doc: &Value,
    ) -> Result<(), SchemaViolation> {
        tracing::debug!(file = %location.display(), "validating additional information");

        self.schemas.validate(SchemaKind::AdditionalInfo, doc)?;
        check_resources(&mut session.log, &self.source, location, doc);

        session
            .log
            .info(location, "Contains valid additional information");
        Ok(())
    }
}

/// The file to validate for `input`: `submission.yaml` inside a directory,
/// otherwise `input` itself.
pub fn entry_point(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join(SUBMISSION_FILE)
    } else {
        input.to_path_buf()
    }
}

fn base_dir(location: &Path) -> &Path {
    location.parent().unwrap_or_else(|| Path::new(""))
}

fn violation_message(violation: &SchemaViolation) -> String {
    let mut message = format!(
        "{} in {} schema\n{}",
        violation,
        violation.schema,
        violation.fragment_text()
    );
    if violation.count > 1 {
        message.push_str(&format!("\n({} violations in total)", violation.count));
    }
    message
}
