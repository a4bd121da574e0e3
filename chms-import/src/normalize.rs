//! Field normalizers
//!
//! Pure conversions from spreadsheet cell text to canonical values. The
//! only side effect is diagnostic logging.
//!
//! Dates in the source follow the day-first convention. Input such as
//! `3/4/2020` is always read as 3 April; a month-first value can only be
//! detected when its day is above 12, and that ambiguity cannot be
//! resolved from the cell alone.

use crate::error::RowError;
use chms_common::db::ImportantDate;
use chms_common::people::{
    DietaryPreference, Gender, HouseholdRole, MaritalStatus, MembershipStatus,
};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::{debug, warn};

/// Occasion name used when the source leaves it blank or as `?`
pub const UNKNOWN_OCCASION: &str = "unknown";

/// Normalize a date cell
///
/// Accepted shapes:
/// - `YYYY` → 1 January of that year
/// - `M/YYYY`, `MM/YYYY` → first day of that month
/// - `D/M/YYYY` (day first). When the second number is above 12 and the
///   first is not, the pair is swapped (month-first outlier).
///
/// Anything else, including blank and `?`, yields `None`. So does a
/// matching shape that is not a real calendar date (`13/13/2020`,
/// `31/2/2020`).
pub fn normalize_date(raw: Option<&str>) -> Option<NaiveDate> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "?" {
        return None;
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    let date = match parts.as_slice() {
        [year] if is_digits(year, 4, 4) => ymd(year, "1", "1"),
        [month, year] if is_digits(month, 1, 2) && is_digits(year, 4, 4) => {
            ymd(year, month, "1")
        }
        [first, second, year]
            if is_digits(first, 1, 2) && is_digits(second, 1, 2) && is_digits(year, 4, 4) =>
        {
            let first_n: u32 = first.parse().ok()?;
            let second_n: u32 = second.parse().ok()?;
            let (day, month) = if second_n > 12 && first_n <= 12 {
                (second_n, first_n)
            } else {
                (first_n, second_n)
            };
            let year_n: i32 = year.parse().ok()?;
            NaiveDate::from_ymd_opt(year_n, month, day)
        }
        _ => return None,
    };

    if date.is_none() {
        debug!("Date {:?} matches a known shape but is not a calendar date", trimmed);
    }
    date
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Split a full name into first name and the rest
///
/// Whitespace runs separate tokens; the remaining tokens are re-joined with
/// single spaces.
pub fn split_name(full_name: &str) -> (String, Option<String>) {
    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().unwrap_or("").to_string();
    let rest: Vec<&str> = tokens.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };
    (first, last)
}

/// Parse the "Dates to Remember" cell
///
/// One entry per line, `<date> - <occasion>`. Only the first hyphen
/// separates the date; the occasion may contain more. Lines that cannot be
/// read are skipped with a warning and never fail the row.
pub fn parse_important_dates(raw: Option<&str>, line_number: usize) -> Vec<ImportantDate> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let Some((date_part, occasion)) = line.split_once('-') else {
            warn!("[Row {}] Malformed important date: {:?}", line_number, line);
            continue;
        };

        let Some(date) = normalize_date(Some(date_part)) else {
            warn!(
                "[Row {}] Unparseable date in important dates: {:?}",
                line_number,
                date_part.trim()
            );
            continue;
        };

        let occasion = occasion.trim();
        let name = if occasion.is_empty() || occasion == "?" {
            UNKNOWN_OCCASION
        } else {
            occasion
        };
        entries.push(ImportantDate::new(date, name));
    }
    entries
}

/// Normalize an enum-like cell against its allowed values
///
/// Lowercases, trims and joins words with `_` ("Regular Attendee" →
/// "regular_attendee"). Blank input is `Ok(None)`.
pub fn map_enum(
    raw: Option<&str>,
    allowed: &[&str],
    field: &'static str,
) -> Result<Option<String>, RowError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let normalized = raw
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    if !allowed.contains(&normalized.as_str()) {
        return Err(RowError::InvalidEnumValue {
            field,
            value: raw.to_string(),
        });
    }
    Ok(Some(normalized))
}

fn map_typed<T: FromStr>(
    raw: Option<&str>,
    allowed: &[&str],
    field: &'static str,
) -> Result<Option<T>, RowError> {
    match map_enum(raw, allowed, field)? {
        Some(value) => value.parse().map(Some).map_err(|_| RowError::InvalidEnumValue {
            field,
            value,
        }),
        None => Ok(None),
    }
}

pub fn map_gender(raw: Option<&str>) -> Result<Option<Gender>, RowError> {
    map_typed(raw, Gender::VALUES, "gender")
}

pub fn map_marital_status(raw: Option<&str>) -> Result<Option<MaritalStatus>, RowError> {
    map_typed(raw, MaritalStatus::VALUES, "maritalStatus")
}

pub fn map_dietary_preference(raw: Option<&str>) -> Result<Option<DietaryPreference>, RowError> {
    map_typed(raw, DietaryPreference::VALUES, "dietaryPreference")
}

pub fn map_membership_status(raw: Option<&str>) -> Result<Option<MembershipStatus>, RowError> {
    map_typed(raw, MembershipStatus::VALUES, "membershipStatus")
}

/// Map the spreadsheet relation to a household role
///
/// Case-insensitive. `individual` is a household of one, so its role is
/// `head`.
pub fn map_household_role(relation: &str) -> Result<HouseholdRole, RowError> {
    match relation.trim().to_lowercase().as_str() {
        "head" | "individual" => Ok(HouseholdRole::Head),
        "spouse" => Ok(HouseholdRole::Spouse),
        "child" => Ok(HouseholdRole::Child),
        _ => Err(RowError::InvalidRelation(relation.to_string())),
    }
}
