//! # Additional Resources
//!
//! Checks the `additional_resources` list of a submission entry or header
//! document. External resources (any `location` with a URI scheme) are not
//! verifiable and are skipped. Local resources must exist next to the file
//! that lists them and must be flat file names, since consumers look them up
//! without reconstructing a directory tree. Both findings are warnings.

use std::path::Path;

use hepsub_core::DiagnosticLog;
use serde_json::Value;

use crate::source::BundleSource;

/// Key of the resource list.
pub const ADDITIONAL_RESOURCES: &str = "additional_resources";
/// Key of a resource's path or URL.
pub const LOCATION: &str = "location";

/// Check every resource listed in `doc`, recording warnings against `file`.
///
/// Returns the number of warnings recorded.
pub fn check_resources(
    log: &mut DiagnosticLog,
    source: &impl BundleSource,
    file: &Path,
    doc: &Value,
) -> usize {
    let Some(resources) = doc.get(ADDITIONAL_RESOURCES).and_then(Value::as_array) else {
        return 0;
    };
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    let mut warnings = 0;

    for resource in resources {
        let location = resource.get(LOCATION).and_then(Value::as_str).unwrap_or("");
        if is_external(location) {
            tracing::debug!(location, "skipping external resource");
            continue;
        }

        let resolved = base.join(location);
        if !source.is_file(&resolved) {
            log.warning(file, format!("Resource {} not found", resolved.display()));
            warnings += 1;
        }
        if has_separator(location) {
            log.warning(
                file,
                format!("Resource {} should not contain \"/\"", resolved.display()),
            );
            warnings += 1;
        }
    }
    warnings
}

/// Whether `location` points outside the bundle (`http...` or `scheme://`).
pub fn is_external(location: &str) -> bool {
    if location.starts_with("http") {
        return true;
    }
    let Some((scheme, _)) = location.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether a file name contains a path separator.
pub fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LocalFiles;
    use hepsub_core::Severity;
    use serde_json::json;

    #[test]
    fn test_external_locations() {
        assert!(is_external("http://example.org/a.png"));
        assert!(is_external("https://example.org/a.png"));
        assert!(is_external("ftp://example.org/a.png"));
        assert!(is_external("git+ssh://host/repo"));
        assert!(!is_external("plot.png"));
        assert!(!is_external("fig1/plot.png"));
        assert!(!is_external("c://odd"));
        assert!(!is_external("1abc://odd"));
    }

    #[test]
    fn test_no_resources_is_silent() {
        let mut log = DiagnosticLog::new();
        let n = check_resources(&mut log, &LocalFiles, Path::new("sub.yaml"), &json!({}));
        assert_eq!(n, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_existing_flat_resource_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plot.png"), b"png").unwrap();
        let file = dir.path().join("submission.yaml");
        let doc = json!({"additional_resources": [{"location": "plot.png"}]});

        let mut log = DiagnosticLog::new();
        assert_eq!(check_resources(&mut log, &LocalFiles, &file, &doc), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_resource_warns() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("submission.yaml");
        let doc = json!({"additional_resources": [{"location": "absent.png"}]});

        let mut log = DiagnosticLog::new();
        assert_eq!(check_resources(&mut log, &LocalFiles, &file, &doc), 1);
        let warnings = log.get(&file, Some(Severity::Warning), true);
        assert!(warnings[0].message.ends_with("absent.png not found"));
    }

    #[test]
    fn test_separator_warns_even_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fig1")).unwrap();
        std::fs::write(dir.path().join("fig1").join("plot.png"), b"png").unwrap();
        let file = dir.path().join("submission.yaml");
        let doc = json!({"additional_resources": [{"location": "fig1/plot.png"}]});

        let mut log = DiagnosticLog::new();
        assert_eq!(check_resources(&mut log, &LocalFiles, &file, &doc), 1);
        let warnings = log.get(&file, Some(Severity::Warning), true);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("should not contain \"/\""));
    }

    #[test]
    fn test_missing_nested_resource_warns_twice() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("submission.yaml");
        let doc = json!({"additional_resources": [{"location": "fig1/plot.png"}]});

        let mut log = DiagnosticLog::new();
        assert_eq!(check_resources(&mut log, &LocalFiles, &file, &doc), 2);
    }

    #[test]
    fn test_external_resource_skipped() {
        let mut log = DiagnosticLog::new();
        let doc = json!({"additional_resources": [{"location": "https://cds.cern.ch/a/b.pdf"}]});
        assert_eq!(
            check_resources(&mut log, &LocalFiles, Path::new("sub.yaml"), &doc),
            0
        );
        assert!(log.is_empty());
    }
}
