//! Import run summary
//!
//! Counters for one run plus one failure record per row that was attempted
//! and rolled back. Rendered for the terminal via `Display` and exported
//! as JSON via serde.

use serde::Serialize;
use std::fmt;

const BANNER: &str = "========== IMPORT SUMMARY ==========";
const RULE: &str = "====================================";

/// A row that was attempted but not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRow {
    /// 1-based line in the source file (header is line 1)
    pub line_number: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome of an import run
///
/// Always `succeeded + failed == attempted` and
/// `attempted + skipped == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    /// Rows never attempted (no name, or orphaned dependents)
    pub skipped: usize,
    /// Subset of `skipped`: spouse/child rows without a family
    pub orphaned: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FailedRow>,
    /// Transactions were rolled back instead of committed
    pub dry_run: bool,
}

impl ImportSummary {
    pub fn new(total: usize, dry_run: bool) -> Self {
        Self {
            total,
            dry_run,
            ..Default::default()
        }
    }

    pub fn record_skipped(&mut self, count: usize) {
        self.skipped += count;
    }

    pub fn record_orphaned(&mut self, count: usize) {
        self.skipped += count;
        self.orphaned += count;
    }

    pub fn record_attempted(&mut self, count: usize) {
        self.attempted += count;
    }

    pub fn record_succeeded(&mut self, count: usize) {
        self.succeeded += count;
    }

    pub fn record_failure(&mut self, line_number: usize, name: &str, reason: &str) {
        self.failed += 1;
        self.failures.push(FailedRow {
            line_number,
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BANNER)?;
        if self.dry_run {
            writeln!(f, "(dry run - nothing was committed)")?;
        }
        writeln!(f, "{:<20}{}", "Total CSV rows:", self.total)?;
        writeln!(f, "{:<20}{}", "Rows skipped:", self.skipped)?;
        writeln!(f, "{:<20}{}", "  (orphaned):", self.orphaned)?;
        writeln!(f, "{:<20}{}", "Rows attempted:", self.attempted)?;
        writeln!(f, "{:<20}{}", "Rows succeeded:", self.succeeded)?;
        writeln!(f, "{:<20}{}", "Rows failed:", self.failed)?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed rows:")?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "  Row {} ({}): {}",
                    failure.line_number, failure.name, failure.reason
                )?;
            }
        }

        write!(f, "{}", RULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_counters_and_failures() {
        let mut summary = ImportSummary::new(5, false);
        summary.record_skipped(1);
        summary.record_orphaned(1);
        summary.record_attempted(3);
        summary.record_succeeded(1);
        summary.record_failure(4, "Anil Kumar", "Invalid gender value: \"X\"");
        summary.record_failure(5, "Asha Kumar", "Invalid gender value: \"X\"");

        let expected = "\
========== IMPORT SUMMARY ==========
Total CSV rows:     5
Rows skipped:       2
  (orphaned):       1
Rows attempted:     3
Rows succeeded:     1
Rows failed:        2

Failed rows:
  Row 4 (Anil Kumar): Invalid gender value: \"X\"
  Row 5 (Asha Kumar): Invalid gender value: \"X\"
====================================";
        assert_eq!(summary.to_string(), expected);
    }

    #[test]
    fn no_failure_section_when_clean() {
        let mut summary = ImportSummary::new(1, false);
        summary.record_attempted(1);
        summary.record_succeeded(1);

        let text = summary.to_string();
        assert!(!text.contains("Failed rows:"));
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn dry_run_is_flagged() {
        let summary = ImportSummary::new(0, true);
        assert!(summary.to_string().contains("dry run"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["failures"], serde_json::json!([]));
    }
}
