//! # Table Consistency
//!
//! Every independent and dependent variable of a table lists one entry per
//! row in its `values` array. The schema cannot express that these arrays
//! agree in length, so a mismatch is reported as a warning: the table still
//! validates, but its rows cannot be zipped together unambiguously.

use std::collections::BTreeSet;
use std::path::Path;

use hepsub_core::{DiagnosticLog, DEPENDENT_VARIABLES, INDEPENDENT_VARIABLES};
use serde_json::Value;

/// `values` lengths of every column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLengths {
    /// One length per independent variable, in document order.
    pub independent: Vec<usize>,
    /// One length per dependent variable, in document order.
    pub dependent: Vec<usize>,
}

impl ColumnLengths {
    /// Measure the columns of a table document. Columns without a `values`
    /// array count as empty.
    pub fn of(table: &Value) -> Self {
        Self {
            independent: lengths(table, INDEPENDENT_VARIABLES),
            dependent: lengths(table, DEPENDENT_VARIABLES),
        }
    }

    /// Distinct lengths across all columns.
    pub fn distinct(&self) -> BTreeSet<usize> {
        self.independent
            .iter()
            .chain(&self.dependent)
            .copied()
            .collect()
    }

    /// Whether every column has the same number of values.
    pub fn is_consistent(&self) -> bool {
        self.distinct().len() <= 1
    }
}

/// Compare column lengths of `table`, recording one warning against `file`
/// when they disagree. Returns whether the table is consistent.
pub fn check_table(log: &mut DiagnosticLog, file: &Path, table: &Value) -> bool {
    let columns = ColumnLengths::of(table);
    if columns.is_consistent() {
        return true;
    }
    log.warning(
        file,
        format!(
            "Inconsistent lengths of independent variables {:?} and dependent variables {:?}",
            columns.independent, columns.dependent
        ),
    );
    false
}

fn lengths(table: &Value, key: &str) -> Vec<usize> {
    table
        .get(key)
        .and_then(Value::as_array)
        .map(|columns| {
            columns
                .iter()
                .map(|c| c.get("values").and_then(Value::as_array).map_or(0, Vec::len))
                .collect()
        })
        .unwrap_or_default()
}
