//! Row validation
//!
//! The single structural gate before grouping: a row without a name cannot
//! become a person. Every other problem (bad dates, enums, relations) is
//! left for the transformer so that it fails only the affected household.

use crate::source::{RawRow, FIRST_DATA_LINE};
use tracing::warn;

/// Row that passed validation, with its source line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub row: RawRow,
    pub line_number: usize,
}

impl ValidatedRow {
    /// Name as shown in reports (never empty)
    pub fn name(&self) -> &str {
        self.row.name_str()
    }
}

/// Keep the row iff its trimmed name is non-empty
pub fn validate_row(row: RawRow, line_number: usize) -> Option<ValidatedRow> {
    if row.name_str().trim().is_empty() {
        warn!("[Row {}] Skipped - no Name", line_number);
        return None;
    }
    Some(ValidatedRow { row, line_number })
}

/// Validate a whole file's rows, numbering them from the first data line
pub fn validate_rows(rows: Vec<RawRow>) -> Vec<ValidatedRow> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| validate_row(row, i + FIRST_DATA_LINE))
        .collect()
}
