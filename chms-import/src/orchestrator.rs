//! Import orchestration
//!
//! Drives one run end to end: validate, group into households, then write
//! each household in its own transaction. A household either lands
//! completely (household record plus every member) or not at all; one bad
//! member fails the whole group and every member gets a failure record
//! carrying the shared reason.
//!
//! Groups are processed strictly one after another. A dry run wraps the
//! whole run in one transaction that is rolled back at the end, so later
//! groups still collide with earlier ones exactly as in a real run.

use crate::db::{insert_household, insert_person};
use crate::error::{ImportResult, RowError};
use crate::household::{group_by_household, HouseholdGroup};
use crate::source::{read_rows, RawRow};
use crate::summary::ImportSummary;
use crate::transform::transform_row;
use crate::validator::validate_rows;
use chms_common::db::NewHousehold;
use sqlx::{Connection, SqliteConnection, SqlitePool};
use std::path::Path;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Per-run switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Run every group inside one transaction that is rolled back at the end
    pub dry_run: bool,
}

/// Read `path` and import it
///
/// Only run-start problems (unreadable file, malformed CSV, missing header
/// columns) are errors; row and household failures end up in the summary.
pub async fn import_file(
    pool: &SqlitePool,
    path: &Path,
    options: &ImportOptions,
) -> ImportResult<ImportSummary> {
    info!("Reading CSV: {}", path.display());
    let rows = read_rows(path)?;
    Ok(run_import(pool, rows, options).await)
}

/// Import already-parsed rows
pub async fn run_import(
    pool: &SqlitePool,
    rows: Vec<RawRow>,
    options: &ImportOptions,
) -> ImportSummary {
    let mut summary = ImportSummary::new(rows.len(), options.dry_run);
    info!("Found {} rows", summary.total);

    let valid = validate_rows(rows);
    summary.record_skipped(summary.total - valid.len());

    let resolution = group_by_household(valid);
    summary.record_orphaned(resolution.orphans.len());
    info!(
        "Resolved {} household groups ({} orphaned rows)",
        resolution.groups.len(),
        resolution.orphans.len()
    );

    // Dry run: one outer transaction for the whole run, a savepoint per group
    let session = if options.dry_run {
        match pool.begin().await {
            Ok(mut outer) => {
                import_groups(&mut *outer, &resolution.groups, &mut summary).await;
                if let Err(e) = outer.rollback().await {
                    warn!("Dry run rollback failed: {}", e);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    } else {
        match pool.acquire().await {
            Ok(mut conn) => {
                import_groups(&mut *conn, &resolution.groups, &mut summary).await;
                Ok(())
            }
            Err(e) => Err(e),
        }
    };

    if let Err(e) = session {
        let reason = RowError::from(e).to_string();
        error!("No database connection: {}", reason);
        for group in &resolution.groups {
            summary.record_attempted(group.members.len());
            for member in &group.members {
                summary.record_failure(member.line_number, member.name(), &reason);
            }
        }
    }

    info!(
        "Import finished: {} succeeded, {} failed, {} skipped",
        summary.succeeded, summary.failed, summary.skipped
    );
    summary
}

async fn import_groups(
    conn: &mut SqliteConnection,
    groups: &[HouseholdGroup],
    summary: &mut ImportSummary,
) {
    for group in groups {
        summary.record_attempted(group.members.len());

        match import_group(&mut *conn, group).await {
            Ok(household_id) => {
                summary.record_succeeded(group.members.len());
                info!(
                    "Imported household '{}' ({} members) as {}",
                    group.household_name(),
                    group.members.len(),
                    household_id
                );
            }
            Err(e) => {
                let reason = e.to_string();
                error!(
                    "Household '{}' rolled back: {}",
                    group.household_name(),
                    reason
                );
                for member in &group.members {
                    summary.record_failure(member.line_number, member.name(), &reason);
                }
            }
        }
    }
}

/// Write one household group atomically, returning the household id
///
/// Opens a transaction on `conn`, or a savepoint when `conn` is already
/// inside one.
async fn import_group(
    conn: &mut SqliteConnection,
    group: &HouseholdGroup,
) -> Result<Uuid, RowError> {
    let mut tx = conn.begin().await?;

    match insert_group(&mut *tx, group).await {
        Ok(household_id) => {
            tx.commit().await?;
            Ok(household_id)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn insert_group(
    conn: &mut SqliteConnection,
    group: &HouseholdGroup,
) -> Result<Uuid, RowError> {
    let household = NewHousehold {
        name: group.household_name(),
    };
    let household_id = insert_household(&mut *conn, &household).await?;

    for member in &group.members {
        let role = group.role_for(&member.row);
        let person = transform_row(&member.row, &role, household_id, member.line_number)?;
        insert_person(&mut *conn, &person).await?;
        debug!(
            "[Row {}] Inserted {} as {}",
            member.line_number,
            person.full_name(),
            person.household_role
        );
    }

    Ok(household_id)
}
