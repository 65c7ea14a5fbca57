//! # Severity Levels
//!
//! Totally ordered `Info < Warning < Error`. The numeric values (0, 1, 2)
//! are part of the report contract and are what threshold filters compare.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Severity of a single diagnostic.
///
/// Ordering follows the numeric level, so `severity >= Severity::Warning`
/// selects warnings and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// A recognized document validated successfully.
    Info = 0,
    /// An advisory inconsistency that does not fail validation.
    Warning = 1,
    /// A structural or schema failure.
    Error = 2,
}

impl Severity {
    /// All levels in ascending order.
    pub fn all() -> &'static [Severity] {
        &[Self::Info, Self::Warning, Self::Error]
    }

    /// Numeric level (0, 1 or 2).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Upper-case identifier, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Capitalized label used in the human-readable report.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Whether `self` passes a filter for `least`.
    ///
    /// With `exact`, only the same level matches; otherwise the level and
    /// everything more severe.
    pub fn matches(self, least: Severity, exact: bool) -> bool {
        if exact {
            self == least
        } else {
            self >= least
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    /// Parse a level name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(CoreError::UnknownSeverity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Info.level(), 0);
        assert_eq!(Severity::Warning.level(), 1);
        assert_eq!(Severity::Error.level(), 2);
    }

    #[test]
    fn test_threshold_and_exact_filters() {
        assert!(Severity::Error.matches(Severity::Warning, false));
        assert!(!Severity::Error.matches(Severity::Warning, true));
        assert!(Severity::Warning.matches(Severity::Warning, true));
        assert!(!Severity::Info.matches(Severity::Warning, false));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("info".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fatal".parse::<Severity>().unwrap_err();
        assert_eq!(err, CoreError::UnknownSeverity("fatal".to_string()));
    }

    #[test]
    fn test_as_str_roundtrip() {
        for level in Severity::all() {
            assert_eq!(level.as_str().parse::<Severity>().unwrap(), *level);
        }
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
    }
}
