//! # Report Rendering
//!
//! Human-readable and JSON views of a [`DiagnosticLog`].
//!
//! The text listing prints each file followed by its diagnostics, one per
//! tab-indented line. The summary prints one line per file:
//!
//! ```text
//! bundle/submission.yaml is clean and is valid
//! bundle/data1.yaml has warnings but is valid
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hepsub_core::{Diagnostic, DiagnosticLog, Severity};
use serde::Serialize;

/// Write the diagnostics of `file` (or of every file, when `None`) at
/// `least` severity or above.
///
/// Above `Info`, files with nothing to show are skipped.
pub fn write_messages(
    out: &mut impl Write,
    log: &DiagnosticLog,
    file: Option<&Path>,
    least: Severity,
) -> io::Result<()> {
    let files: Vec<&Path> = match file {
        Some(file) => vec![file],
        None => log.files().collect(),
    };
    for file in files {
        let messages = log.get(file, Some(least), false);
        if messages.is_empty() && least > Severity::Info {
            continue;
        }
        writeln!(out, "{}", file.display())?;
        for message in messages {
            writeln!(out, "\t{message}")?;
        }
    }
    Ok(())
}

/// Write one summary line per touched file. Nothing is written unless
/// `least` is `Info`.
pub fn write_summary(out: &mut impl Write, log: &DiagnosticLog, least: Severity) -> io::Result<()> {
    if least > Severity::Info {
        return Ok(());
    }
    for file in log.files() {
        writeln!(out, "{}", summary_line(log, file))?;
    }
    Ok(())
}

/// `<file> {is clean|has warnings} {and|but} {is valid|has errors}`.
pub fn summary_line(log: &DiagnosticLog, file: &Path) -> String {
    let errors = log.has_errors(Some(file));
    let warnings = log.has_warnings(Some(file));
    format!(
        "{} {} {} {}",
        file.display(),
        if warnings { "has warnings" } else { "is clean" },
        if warnings != errors { "but" } else { "and" },
        if errors { "has errors" } else { "is valid" },
    )
}

/// Machine-readable view of a whole session log.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// True if no file has an error.
    pub valid: bool,
    /// Number of errors across all files.
    pub errors: usize,
    /// Number of warnings across all files.
    pub warnings: usize,
    /// Per-file results in the order files were reached.
    pub files: Vec<FileReport>,
}

/// Result for one file of a [`Report`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The file.
    pub file: PathBuf,
    /// True if the file has no errors.
    pub valid: bool,
    /// True if the file has no warnings.
    pub clean: bool,
    /// Diagnostics at or above the report threshold.
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Build a report keeping diagnostics at `least` severity or above.
    /// Validity and counts always reflect the full log.
    pub fn from_log(log: &DiagnosticLog, least: Severity) -> Self {
        let files = log
            .get_all(Some(least), false)
            .into_iter()
            .map(|(file, diagnostics)| FileReport {
                file: file.to_path_buf(),
                valid: !log.has_errors(Some(file)),
                clean: !log.has_warnings(Some(file)),
                diagnostics: diagnostics.into_iter().cloned().collect(),
            })
            .collect();
        Self {
            valid: !log.has_errors(None),
            errors: log.count(Severity::Error),
            warnings: log.count(Severity::Warning),
            files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiagnosticLog {
        let mut log = DiagnosticLog::new();
        log.info("submission.yaml", "Contains the valid submission Table 1");
        log.warning("data1.yaml", "Inconsistent lengths");
        log.info("data1.yaml", "Contains a valid data table");
        log.error("data2.yaml", "Cannot read file");
        log.warning("data3.yaml", "Resource a/b not found");
        log.error("data3.yaml", "bad");
        log
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_lines() {
        let log = sample();
        assert_eq!(
            summary_line(&log, Path::new("submission.yaml")),
            "submission.yaml is clean and is valid"
        );
        assert_eq!(
            summary_line(&log, Path::new("data1.yaml")),
            "data1.yaml has warnings but is valid"
        );
        assert_eq!(
            summary_line(&log, Path::new("data2.yaml")),
            "data2.yaml is clean but has errors"
        );
        assert_eq!(
            summary_line(&log, Path::new("data3.yaml")),
            "data3.yaml has warnings and has errors"
        );
    }

    #[test]
    fn test_summary_only_at_info() {
        let log = sample();
        let text = render(|out| write_summary(out, &log, Severity::Info));
        assert_eq!(text.lines().count(), 4);
        let quiet = render(|out| write_summary(out, &log, Severity::Warning));
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_messages_skip_files_without_findings() {
        let log = sample();
        let text = render(|out| write_messages(out, &log, None, Severity::Warning));
        assert_eq!(
            text,
            "data1.yaml\n\tWarning    - Inconsistent lengths\n\
             data2.yaml\n\tError      - Cannot read file\n\
             data3.yaml\n\tWarning    - Resource a/b not found\n\tError      - bad\n"
        );
    }

    #[test]
    fn test_messages_at_info_list_every_file() {
        let log = sample();
        let text = render(|out| write_messages(out, &log, Some(Path::new("submission.yaml")), Severity::Info));
        assert_eq!(
            text,
            "submission.yaml\n\tInfo       - Contains the valid submission Table 1\n"
        );
    }

    #[test]
    fn test_json_report() {
        let log = sample();
        let report = Report::from_log(&log, Severity::Warning);
        assert!(!report.valid);
        assert_eq!(report.errors, 2);
        assert_eq!(report.warnings, 2);
        assert_eq!(report.files.len(), 4);
        assert!(report.files[0].diagnostics.is_empty());
        assert!(report.files[0].valid && report.files[0].clean);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["files"][2]["diagnostics"][0]["severity"], "ERROR");
        assert_eq!(value["files"][1]["file"], "data1.yaml");
    }
}
