//! Household database operations

use super::parse_id;
use chms_common::db::NewHousehold;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Stored household
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
}

/// Insert a household and return its generated id
pub async fn insert_household(
    conn: &mut SqliteConnection,
    household: &NewHousehold,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO households (id, name, created_at, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(id.to_string())
    .bind(&household.name)
    .execute(conn)
    .await?;

    Ok(id)
}

/// All households in insertion order
pub async fn load_households(pool: &SqlitePool) -> Result<Vec<Household>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, name FROM households ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| -> Result<Household, sqlx::Error> {
            let id: String = row.get("id");
            Ok(Household {
                id: parse_id(&id)?,
                name: row.get("name"),
            })
        })
        .collect()
}
