//! Person database operations

use super::parse_id;
use crate::error::RowError;
use chms_common::db::PersonRecord;
use chms_common::people::HouseholdRole;
use chrono::NaiveDate;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Subset of a stored person used by reports and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPerson {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub household_id: Option<Uuid>,
    pub household_role: Option<HouseholdRole>,
    /// Raw `important_dates` JSON
    pub important_dates: String,
}

/// Insert a person and return the generated id
///
/// Enum columns are written in their stored string form and
/// `important_dates` as a JSON array.
pub async fn insert_person(
    conn: &mut SqliteConnection,
    person: &PersonRecord,
) -> Result<Uuid, RowError> {
    let id = Uuid::new_v4();
    let important_dates =
        serde_json::to_string(&person.important_dates).map_err(|source| RowError::Encode {
            column: "important_dates",
            source,
        })?;

    sqlx::query(
        r#"
        INSERT INTO people (
            id, first_name, last_name, gender, date_of_birth,
            phone, email,
            address_line_1, address_line_2, city, state, country,
            occupation, marital_status, wedding_date, memorial_day,
            dietary_preference, preferred_visiting_time, important_dates,
            membership_status, baptism_date, baptism_place,
            household_id, household_role, is_active,
            created_at, updated_at
        ) VALUES (
            ?, ?, ?, ?, ?,
            ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
        )
        "#,
    )
    .bind(id.to_string())
    .bind(&person.first_name)
    .bind(&person.last_name)
    .bind(person.gender.map(|g| g.as_str()))
    .bind(person.date_of_birth)
    .bind(&person.phone)
    .bind(&person.email)
    .bind(&person.address_line1)
    .bind(&person.address_line2)
    .bind(&person.city)
    .bind(&person.state)
    .bind(&person.country)
    .bind(&person.occupation)
    .bind(person.marital_status.as_str())
    .bind(person.wedding_date)
    .bind(person.memorial_day)
    .bind(person.dietary_preference.map(|d| d.as_str()))
    .bind(&person.preferred_visiting_time)
    .bind(important_dates)
    .bind(person.membership_status.as_str())
    .bind(person.baptism_date)
    .bind(&person.baptism_place)
    .bind(person.household_id.to_string())
    .bind(person.household_role.as_str())
    .bind(person.is_active)
    .execute(conn)
    .await?;

    Ok(id)
}

/// All people in insertion order
pub async fn load_people(pool: &SqlitePool) -> Result<Vec<StoredPerson>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, first_name, last_name, date_of_birth,
               household_id, household_role, important_dates
        FROM people
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<StoredPerson, sqlx::Error> {
            let id: String = row.get("id");
            let household_id: Option<String> = row.get("household_id");
            let role: Option<String> = row.get("household_role");

            Ok(StoredPerson {
                id: parse_id(&id)?,
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                date_of_birth: row.get("date_of_birth"),
                household_id: household_id.as_deref().map(parse_id).transpose()?,
                household_role: role
                    .as_deref()
                    .map(str::parse::<HouseholdRole>)
                    .transpose()
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                important_dates: row.get("important_dates"),
            })
        })
        .collect()
}

/// `(id, raw important_dates JSON)` for every person
pub async fn load_important_dates(
    pool: &SqlitePool,
) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, important_dates
        FROM people
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<(Uuid, String), sqlx::Error> {
            let id: String = row.get("id");
            Ok((parse_id(&id)?, row.get("important_dates")))
        })
        .collect()
}

/// Overwrite one person's important dates with an encoded JSON array
pub async fn update_important_dates(
    pool: &SqlitePool,
    person_id: Uuid,
    dates_json: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE people
        SET important_dates = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(dates_json)
    .bind(person_id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}
