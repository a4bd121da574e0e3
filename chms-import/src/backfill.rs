//! Important-dates backfill
//!
//! Older rows stored important-date entries without an `id` or a
//! `recurrence`. This pass gives each such entry a fresh id and a yearly
//! recurrence, leaving entries that already carry both untouched.

use crate::db::{load_important_dates, update_important_dates};
use chms_common::db::ImportantDate;
use chms_common::people::Recurrence;
use chms_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    /// Every person read from the table
    pub scanned: usize,
    pub updated: usize,
    /// People whose stored JSON could not be decoded (left as is)
    pub unreadable: usize,
}

/// Fill in missing ids and recurrences; returns true if anything changed
pub fn patch_dates(dates: &mut [ImportantDate]) -> bool {
    let mut changed = false;
    for entry in dates.iter_mut().filter(|d| d.needs_backfill()) {
        entry.id.get_or_insert_with(Uuid::new_v4);
        entry.recurrence.get_or_insert(Recurrence::Yearly);
        changed = true;
    }
    changed
}

pub async fn backfill_important_dates(pool: &SqlitePool) -> Result<BackfillReport> {
    let mut report = BackfillReport::default();

    for (person_id, raw) in load_important_dates(pool).await? {
        report.scanned += 1;
        let mut dates: Vec<ImportantDate> = match serde_json::from_str(&raw) {
            Ok(dates) => dates,
            Err(e) => {
                warn!("Person {}: unreadable important_dates: {}", person_id, e);
                report.unreadable += 1;
                continue;
            }
        };
        if patch_dates(&mut dates) {
            let json = serde_json::to_string(&dates)?;
            update_important_dates(pool, person_id, &json).await?;
            report.updated += 1;
        }
    }

    info!(
        "Backfill complete: {} people updated out of {} total",
        report.updated, report.scanned
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn only_incomplete_entries_are_patched() {
        let complete =
            ImportantDate::new(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(), "Graduation");
        let legacy = ImportantDate {
            id: None,
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            name: "Anniversary".to_string(),
            recurrence: None,
        };
        let mut dates = vec![complete.clone(), legacy];

        assert!(patch_dates(&mut dates));
        assert_eq!(dates[0], complete);
        assert!(dates[1].id.is_some());
        assert_eq!(dates[1].recurrence, Some(Recurrence::Yearly));
    }

    #[test]
    fn existing_recurrence_is_kept() {
        let mut dates = vec![ImportantDate {
            id: None,
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            name: "Retirement".to_string(),
            recurrence: Some(Recurrence::Once),
        }];

        assert!(patch_dates(&mut dates));
        assert_eq!(dates[0].recurrence, Some(Recurrence::Once));
        assert!(!patch_dates(&mut dates));
    }
}
