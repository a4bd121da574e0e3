//! Database initialization
//!
//! Opens (creating if needed) the SQLite file and brings the schema up to
//! date. Every statement is idempotent so the same call serves first run
//! and every later run.

use crate::people::{DietaryPreference, Gender, HouseholdRole, MaritalStatus, MembershipStatus};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// SQLite busy timeout; the storage layer's only wait bound
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open or create the database and ensure all tables exist
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    // Import runs are sequential; a small pool is plenty
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_households_table(&pool).await?;
    create_people_table(&pool).await?;

    Ok(pool)
}

async fn create_households_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS households (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            address_line_1 TEXT,
            address_line_2 TEXT,
            city TEXT,
            state TEXT,
            country TEXT,
            phone TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_people_table(pool: &SqlitePool) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,

            first_name TEXT NOT NULL,
            last_name TEXT,
            preferred_name TEXT,
            gender TEXT CHECK (gender IN ({gender})),
            date_of_birth TEXT,

            email TEXT UNIQUE,
            phone TEXT,

            address_line_1 TEXT,
            address_line_2 TEXT,
            city TEXT,
            state TEXT,
            country TEXT,

            occupation TEXT,
            marital_status TEXT NOT NULL CHECK (marital_status IN ({marital})),
            wedding_date TEXT,
            memorial_day TEXT,

            membership_status TEXT NOT NULL CHECK (membership_status IN ({membership})),
            baptism_date TEXT,
            baptism_place TEXT,

            dietary_preference TEXT CHECK (dietary_preference IN ({dietary})),
            preferred_visiting_time TEXT,
            important_dates TEXT NOT NULL DEFAULT '[]',

            household_id TEXT REFERENCES households(id) ON DELETE SET NULL,
            household_role TEXT CHECK (household_role IN ({role})),

            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
        gender = sql_value_list(Gender::VALUES),
        marital = sql_value_list(MaritalStatus::VALUES),
        membership = sql_value_list(MembershipStatus::VALUES),
        dietary = sql_value_list(DietaryPreference::VALUES),
        role = sql_value_list(HouseholdRole::VALUES),
    );

    sqlx::query(&sql).execute(pool).await?;

    // Same person entered twice (name + date of birth) is rejected
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS unique_person_identity
        ON people (first_name, last_name, date_of_birth)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_people_household ON people (household_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// `'a', 'b', 'c'` for use inside a CHECK constraint
fn sql_value_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_list_is_quoted_and_comma_separated() {
        assert_eq!(sql_value_list(&["head", "spouse"]), "'head', 'spouse'");
    }
}
