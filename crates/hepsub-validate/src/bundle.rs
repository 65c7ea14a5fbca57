//! # Bundle Parsing
//!
//! Turns the text of one bundle file into its ordered document sequence.
//!
//! - `.json` files hold one aggregate document. A top-level array is read as
//!   a sequence of documents.
//! - Anything else is read as a YAML stream; every `---` separated document
//!   is one entry.
//!
//! Null documents (empty YAML documents, `null` array items) are dropped.
//!
//! YAML documents have merge keys (`<<: *anchor`) applied before conversion.
//! Non-finite floats have no JSON form and are kept as their YAML spelling
//! (`.nan`, `.inf`, `-.inf`), which the `number | string` value schemas
//! accept.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// A bundle location that cannot be turned into documents.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The file could not be read.
    #[error("Cannot read file: {source}")]
    Read {
        /// Path of the file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not well-formed YAML/JSON.
    #[error("Problem parsing file.\n{reason}")]
    Parse {
        /// Path of the file.
        path: String,
        /// Parser message.
        reason: String,
    },
}

/// Parse the content of `location` into its non-null documents.
///
/// # Errors
///
/// Returns [`BundleError::Parse`] if any document of the stream is
/// malformed; no partial result is returned.
pub fn parse_documents(location: &Path, content: &str) -> Result<Vec<Value>, BundleError> {
    let is_json = location
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let value: Value = serde_json::from_str(content).map_err(|e| BundleError::Parse {
            path: location.display().to_string(),
            reason: e.to_string(),
        })?;
        return Ok(match value {
            Value::Array(items) => items.into_iter().filter(|d| !d.is_null()).collect(),
            Value::Null => Vec::new(),
            other => vec![other],
        });
    }

    let mut documents = Vec::new();
    let parse_error = |e: serde_yaml::Error| BundleError::Parse {
        path: location.display().to_string(),
        reason: e.to_string(),
    };
    for document in serde_yaml::Deserializer::from_str(content) {
        let mut yaml = serde_yaml::Value::deserialize(document).map_err(parse_error)?;
        yaml.apply_merge().map_err(parse_error)?;
        let value = yaml_to_json(yaml);
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

fn yaml_to_json(yaml: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => number_to_json(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (mapping_key(key), yaml_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Number(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Value::Number(u.into());
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    match Number::from_f64(f) {
        Some(number) => Value::Number(number),
        None if f.is_nan() => Value::String(".nan".to_string()),
        None if f.is_sign_negative() => Value::String("-.inf".to_string()),
        None => Value::String(".inf".to_string()),
    }
}

/// JSON object key for a YAML mapping key. Scalars use their plain text;
/// anything else its JSON rendering.
fn mapping_key(key: serde_yaml::Value) -> String {
    match yaml_to_json(key) {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_stream_skips_empty_documents() {
        let content = "---\ncomment: header\n---\n---\nname: Table 1\ndata_file: data1.yaml\n";
        let docs = parse_documents(Path::new("submission.yaml"), content).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], json!({"comment": "header"}));
        assert_eq!(docs[1]["data_file"], "data1.yaml");
    }

    #[test]
    fn test_yaml_single_document() {
        let content = "independent_variables:\n- header: {name: x}\n  values:\n  - {value: 1}\n";
        let docs = parse_documents(Path::new("data1.yaml"), content).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["independent_variables"][0]["values"][0]["value"], 1);
    }

    #[test]
    fn test_yaml_merge_keys_are_applied() {
        let content = "\
independent_variables:
- header: &h {name: X, units: GEV}
  values: [{value: 1}]
dependent_variables:
- header: {<<: *h, name: Y}
  values: [{value: 2}]
";
        let docs = parse_documents(Path::new("data1.yaml"), content).unwrap();
        let header = &docs[0]["dependent_variables"][0]["header"];
        assert_eq!(header, &json!({"name": "Y", "units": "GEV"}));
    }

    #[test]
    fn test_non_finite_floats_keep_their_yaml_spelling() {
        let content = "values: [{value: .nan}, {value: .inf}, {value: -.inf}, {value: 1.5}]\n";
        let docs = parse_documents(Path::new("data1.yaml"), content).unwrap();
        let values: Vec<&Value> = docs[0]["values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| &v["value"])
            .collect();
        assert_eq!(values, vec![&json!(".nan"), &json!(".inf"), &json!("-.inf"), &json!(1.5)]);
    }

    #[test]
    fn test_non_string_mapping_keys_become_text() {
        let docs = parse_documents(Path::new("d.yaml"), "1: one\ntrue: yes\n").unwrap();
        assert_eq!(docs[0], json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn test_empty_file_has_no_documents() {
        let docs = parse_documents(Path::new("empty.yaml"), "").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let content = "name: [unterminated\n";
        let err = parse_documents(Path::new("bad.yaml"), content).unwrap_err();
        assert!(matches!(err, BundleError::Parse { .. }));
        assert!(err.to_string().starts_with("Problem parsing file."));
    }

    #[test]
    fn test_json_object_is_one_document() {
        let docs = parse_documents(Path::new("sub.json"), r#"{"comment": "x"}"#).unwrap();
        assert_eq!(docs, vec![json!({"comment": "x"})]);
    }

    #[test]
    fn test_json_array_is_a_document_sequence() {
        let content = r#"[{"comment": "x"}, null, {"name": "T", "data_file": "d.json"}]"#;
        let docs = parse_documents(Path::new("SUB.JSON"), content).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["name"], "T");
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = parse_documents(Path::new("sub.json"), "{").unwrap_err();
        assert!(matches!(err, BundleError::Parse { .. }));
    }
}
