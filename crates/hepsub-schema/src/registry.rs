//! # Schema Registry
//!
//! Loads the three schemas a submission bundle is validated against and
//! compiles one `jsonschema` validator per schema at construction time.
//!
//! | Identifier | File | Applies to |
//! |---|---|---|
//! | `submission` | `submission_schema.json` | submission entries |
//! | `data` | `data_schema.json` | data tables |
//! | `additional-info` | `additional_info_schema.json` | header documents |
//!
//! ## Schema Resolution
//!
//! The draft is taken from each schema's `$schema` keyword. Cross-schema
//! `$ref`s resolve against the three loaded documents, by their `$id` or by
//! bare filename, through a local retriever. Unknown URIs fail compilation
//! instead of triggering a network request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hepsub_core::CoreError;
use serde_json::Value;
use thiserror::Error;

/// Longest rendering of an offending fragment kept in a violation message.
const MAX_FRAGMENT_CHARS: usize = 512;

// ---------------------------------------------------------------------------
// Schema identifiers
// ---------------------------------------------------------------------------

/// One of the three schemas in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Table metadata entries of `submission.yaml`.
    Submission,
    /// Data tables.
    Data,
    /// Submission-level header documents.
    AdditionalInfo,
}

impl SchemaKind {
    /// All schema kinds in load order.
    pub fn all() -> &'static [SchemaKind] {
        &[Self::Submission, Self::Data, Self::AdditionalInfo]
    }

    /// Identifier used on the command line and in messages.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Data => "data",
            Self::AdditionalInfo => "additional-info",
        }
    }

    /// File name of the schema inside a schema directory.
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Submission => "submission_schema.json",
            Self::Data => "data_schema.json",
            Self::AdditionalInfo => "additional_info_schema.json",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SchemaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission" => Ok(Self::Submission),
            "data" => Ok(Self::Data),
            "additional-info" | "additional_info" => Ok(Self::AdditionalInfo),
            other => Err(CoreError::UnknownSchema(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors constructing a [`SchemaRegistry`].
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema file could not be read or parsed as JSON.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path of the schema file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A schema could not be compiled into a validator.
    #[error("failed to compile schema {schema}: {reason}")]
    SchemaCompileError {
        /// The schema that failed to compile.
        schema: SchemaKind,
        /// Human-readable reason.
        reason: String,
    },
}

/// A document rejected by a schema.
///
/// Only the first violation is described in full; `count` records how many
/// the validator found in total.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (at {instance_path})")]
pub struct SchemaViolation {
    /// The schema that was violated.
    pub schema: SchemaKind,
    /// JSON Pointer to the violating field, `(root)` for the document itself.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The offending part of the document.
    pub fragment: Value,
    /// Number of violations found in the document.
    pub count: usize,
}

impl SchemaViolation {
    /// Compact rendering of the offending fragment, truncated for reports.
    pub fn fragment_text(&self) -> String {
        let text = self.fragment.to_string();
        if text.chars().count() <= MAX_FRAGMENT_CHARS {
            return text;
        }
        let mut cut: String = text.chars().take(MAX_FRAGMENT_CHARS).collect();
        cut.push_str("...");
        cut
    }
}

// ---------------------------------------------------------------------------
// Schema retriever for $ref resolution
// ---------------------------------------------------------------------------

/// Resolves `$ref` URIs against the loaded schemas.
///
/// Schemas are registered under their `$id` and their bare filename, so both
/// absolute and relative references between the three files resolve.
struct LocalSchemaRetriever {
    /// Map from URI or filename to parsed schema JSON.
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas.get(uri_str) {
            return Ok(value.clone());
        }
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        self.schemas
            .get(filename)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// The compiled submission, data and additional-info schemas.
///
/// Immutable after construction; a single registry can back any number of
/// validation sessions.
pub struct SchemaRegistry {
    /// Directory the schemas were loaded from; empty for in-memory schemas.
    source: PathBuf,
    submission: Compiled,
    data: Compiled,
    additional_info: Compiled,
}

struct Compiled {
    schema: Value,
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SchemaRegistry {
    /// Load and compile the three schemas from `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoadError`] if a schema file is missing
    /// or not valid JSON, and [`SchemaError::SchemaCompileError`] if a
    /// schema is not a valid JSON Schema.
    pub fn load(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.into();
        let submission = read_schema(&schema_dir, SchemaKind::Submission)?;
        let data = read_schema(&schema_dir, SchemaKind::Data)?;
        let additional_info = read_schema(&schema_dir, SchemaKind::AdditionalInfo)?;

        let registry = Self::compile(schema_dir, submission, data, additional_info)?;
        tracing::debug!(source = %registry.source.display(), "loaded schema registry");
        Ok(registry)
    }

    /// Compile a registry from already-parsed schema documents.
    pub fn from_values(
        submission: Value,
        data: Value,
        additional_info: Value,
    ) -> Result<Self, SchemaError> {
        Self::compile(PathBuf::new(), submission, data, additional_info)
    }

    /// Directory the schemas were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The raw schema document for `kind`.
    pub fn schema(&self, kind: SchemaKind) -> &Value {
        &self.compiled(kind).schema
    }

    /// Validate `instance` against the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaViolation`] describing the first violation found.
    pub fn validate(&self, kind: SchemaKind, instance: &Value) -> Result<(), SchemaViolation> {
        let mut errors = self.compiled(kind).validator.iter_errors(instance);
        let Some(first) = errors.next() else {
            return Ok(());
        };

        let instance_path = first.instance_path.to_string();
        let violation = SchemaViolation {
            schema: kind,
            instance_path: if instance_path.is_empty() {
                "(root)".to_string()
            } else {
                instance_path
            },
            message: first.to_string(),
            fragment: first.instance.clone().into_owned(),
            count: 1 + errors.count(),
        };
        Err(violation)
    }

    /// Returns true if `instance` satisfies the schema for `kind`.
    pub fn is_valid(&self, kind: SchemaKind, instance: &Value) -> bool {
        self.compiled(kind).validator.is_valid(instance)
    }

    fn compiled(&self, kind: SchemaKind) -> &Compiled {
        match kind {
            SchemaKind::Submission => &self.submission,
            SchemaKind::Data => &self.data,
            SchemaKind::AdditionalInfo => &self.additional_info,
        }
    }

    fn compile(
        source: PathBuf,
        submission: Value,
        data: Value,
        additional_info: Value,
    ) -> Result<Self, SchemaError> {
        let mut by_uri = HashMap::new();
        for (kind, schema) in [
            (SchemaKind::Submission, &submission),
            (SchemaKind::Data, &data),
            (SchemaKind::AdditionalInfo, &additional_info),
        ] {
            by_uri.insert(kind.filename().to_string(), schema.clone());
            if let Some(id) = schema.get("$id").and_then(Value::as_str) {
                by_uri.insert(id.trim_end_matches('#').to_string(), schema.clone());
            }
        }

        Ok(Self {
            source,
            submission: compile_one(SchemaKind::Submission, submission, &by_uri)?,
            data: compile_one(SchemaKind::Data, data, &by_uri)?,
            additional_info: compile_one(SchemaKind::AdditionalInfo, additional_info, &by_uri)?,
        })
    }
}

fn read_schema(schema_dir: &Path, kind: SchemaKind) -> Result<Value, SchemaError> {
    let path = schema_dir.join(kind.filename());
    let content =
        std::fs::read_to_string(&path).map_err(|e| SchemaError::SchemaLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoadError {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

fn compile_one(
    kind: SchemaKind,
    schema: Value,
    by_uri: &HashMap<String, Value>,
) -> Result<Compiled, SchemaError> {
    let retriever = LocalSchemaRetriever {
        schemas: by_uri.clone(),
    };
    let validator = jsonschema::options()
        .with_retriever(retriever)
        .build(&schema)
        .map_err(|e| SchemaError::SchemaCompileError {
            schema: kind,
            reason: e.to_string(),
        })?;
    Ok(Compiled { schema, validator })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_values(
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "data_file": {"type": "string"}},
                "required": ["name", "data_file"]
            }),
            json!({
                "type": "object",
                "required": ["independent_variables", "dependent_variables"]
            }),
            json!({"type": "object"}),
        )
        .expect("inline schemas compile")
    }

    #[test]
    fn test_schema_kind_identifiers() {
        for kind in SchemaKind::all() {
            assert_eq!(kind.id().parse::<SchemaKind>().unwrap(), *kind);
        }
        assert_eq!(SchemaKind::AdditionalInfo.filename(), "additional_info_schema.json");
        assert!(matches!(
            "module".parse::<SchemaKind>(),
            Err(CoreError::UnknownSchema(_))
        ));
    }

    #[test]
    fn test_valid_document_passes() {
        let reg = registry();
        let doc = json!({"name": "Table 1", "data_file": "data1.yaml"});
        assert!(reg.validate(SchemaKind::Submission, &doc).is_ok());
        assert!(reg.is_valid(SchemaKind::Submission, &doc));
    }

    #[test]
    fn test_missing_required_field_is_reported() {
        let reg = registry();
        let err = reg
            .validate(SchemaKind::Submission, &json!({"name": "Table 1"}))
            .unwrap_err();
        assert_eq!(err.schema, SchemaKind::Submission);
        assert_eq!(err.instance_path, "(root)");
        assert!(err.message.contains("data_file"), "got: {}", err.message);
        assert_eq!(err.fragment, json!({"name": "Table 1"}));
        assert_eq!(err.count, 1);
    }

    #[test]
    fn test_violation_points_at_field() {
        let reg = registry();
        let err = reg
            .validate(SchemaKind::Submission, &json!({"name": 7, "data_file": "x"}))
            .unwrap_err();
        assert_eq!(err.instance_path, "/name");
        assert_eq!(err.fragment, json!(7));
        assert!(err.to_string().contains("/name"));
    }

    #[test]
    fn test_violation_count() {
        let reg = registry();
        let err = reg
            .validate(SchemaKind::Data, &json!({}))
            .unwrap_err();
        assert_eq!(err.count, 2);
    }

    #[test]
    fn test_non_object_rejected_by_additional_info() {
        let reg = registry();
        assert!(reg.validate(SchemaKind::AdditionalInfo, &json!("text")).is_err());
    }

    #[test]
    fn test_fragment_text_truncates() {
        let violation = SchemaViolation {
            schema: SchemaKind::Data,
            instance_path: "(root)".to_string(),
            message: "too long".to_string(),
            fragment: json!("x".repeat(2 * MAX_FRAGMENT_CHARS)),
            count: 1,
        };
        let text = violation.fragment_text();
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), MAX_FRAGMENT_CHARS + 3);
    }

    #[test]
    fn test_invalid_schema_fails_compilation() {
        let err = SchemaRegistry::from_values(
            json!({"type": 12}),
            json!({}),
            json!({}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::SchemaCompileError {
                schema: SchemaKind::Submission,
                ..
            }
        ));
    }

    #[test]
    fn test_cross_schema_ref_by_filename() {
        let reg = SchemaRegistry::from_values(
            json!({
                "type": "object",
                "properties": {
                    "additional_resources": {
                        "$ref": "additional_info_schema.json#/definitions/resources"
                    }
                }
            }),
            json!({}),
            json!({
                "definitions": {
                    "resources": {
                        "type": "array",
                        "items": {"type": "object", "required": ["location"]}
                    }
                }
            }),
        )
        .unwrap();
        let bad = json!({"additional_resources": [{"description": "no location"}]});
        assert!(reg.validate(SchemaKind::Submission, &bad).is_err());
        let good = json!({"additional_resources": [{"location": "a.png"}]});
        assert!(reg.validate(SchemaKind::Submission, &good).is_ok());
    }
}
