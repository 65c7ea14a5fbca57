//! # Document Classification
//!
//! Submission documents are untyped mappings. Their logical kind is decided
//! by which keys they carry, checked in a fixed order:
//!
//! | Keys present | Kind |
//! |---|---|
//! | `data_file` | [`Kind::SubmissionEntry`] |
//! | a variable array and `description` | [`Kind::CombinedEntry`] |
//! | a variable array | [`Kind::DataTable`] |
//! | anything else | [`Kind::AdditionalInfo`] |
//!
//! Classification has no error path. A document of the wrong shape lands in
//! `AdditionalInfo`, whose schema then reports it.

use serde::Serialize;
use serde_json::{Map, Value};

/// A parsed YAML/JSON document.
pub type Document = Value;

/// Key naming the data file of a submission entry.
pub const DATA_FILE: &str = "data_file";
/// Key of the independent-variable array of a table.
pub const INDEPENDENT_VARIABLES: &str = "independent_variables";
/// Key of the dependent-variable array of a table.
pub const DEPENDENT_VARIABLES: &str = "dependent_variables";
/// Key whose presence next to the variable arrays marks the combined encoding.
pub const DESCRIPTION: &str = "description";
/// Key naming a table.
pub const NAME: &str = "name";

/// Logical kind of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Table metadata pointing at a data file.
    SubmissionEntry,
    /// Independent and dependent variable arrays.
    DataTable,
    /// Metadata and variable arrays merged in one document.
    CombinedEntry,
    /// Header or comment-level metadata.
    AdditionalInfo,
}

impl Kind {
    /// Returns the snake_case identifier of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmissionEntry => "submission_entry",
            Self::DataTable => "data_table",
            Self::CombinedEntry => "combined_entry",
            Self::AdditionalInfo => "additional_info",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the kind of a parsed document.
///
/// Non-mapping documents are [`Kind::AdditionalInfo`].
pub fn classify(doc: &Value) -> Kind {
    let Some(map) = doc.as_object() else {
        return Kind::AdditionalInfo;
    };
    if map.contains_key(DATA_FILE) {
        Kind::SubmissionEntry
    } else if has_variables(map) {
        if map.contains_key(DESCRIPTION) {
            Kind::CombinedEntry
        } else {
            Kind::DataTable
        }
    } else {
        Kind::AdditionalInfo
    }
}

/// Name under which a document registers as a table, if it carries both a
/// variable array and a string `name`.
pub fn table_name(doc: &Value) -> Option<&str> {
    let map = doc.as_object()?;
    if !has_variables(map) {
        return None;
    }
    map.get(NAME).and_then(Value::as_str)
}

/// The two halves of a combined document.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedParts {
    /// The variable arrays, shaped like a stand-alone data table.
    pub table: Document,
    /// Every other key, shaped like a submission entry with an empty
    /// `data_file`.
    pub entry: Document,
}

/// Separate a combined document into its table half and entry half.
///
/// Returns `None` for non-mapping input. The input is not modified.
pub fn split_combined(doc: &Value) -> Option<CombinedParts> {
    let map = doc.as_object()?;
    let mut table = Map::new();
    let mut entry = Map::new();
    for (key, value) in map {
        if key == INDEPENDENT_VARIABLES || key == DEPENDENT_VARIABLES {
            table.insert(key.clone(), value.clone());
        } else {
            entry.insert(key.clone(), value.clone());
        }
    }
    // The submission schema requires the field even though no file exists.
    entry.insert(DATA_FILE.to_string(), Value::String(String::new()));
    Some(CombinedParts {
        table: Value::Object(table),
        entry: Value::Object(entry),
    })
}

fn has_variables(map: &Map<String, Value>) -> bool {
    map.contains_key(INDEPENDENT_VARIABLES) || map.contains_key(DEPENDENT_VARIABLES)
}
