//! Row transformation
//!
//! Maps one spreadsheet row, with the role its household assigns and the id
//! of the household just created, to an insert-ready [`PersonRecord`].

use crate::error::RowError;
use crate::normalize::{
    map_dietary_preference, map_gender, map_household_role, map_marital_status,
    normalize_date, parse_important_dates, split_name,
};
use crate::source::RawRow;
use chms_common::db::PersonRecord;
use chms_common::people::{MaritalStatus, MembershipStatus};
use uuid::Uuid;

/// Build the person record for `row`
///
/// Fails on the first enum-backed column (gender, marital status, dietary
/// preference, role) whose value is outside its allowed set. Unreadable
/// dates become `None` and never fail the row.
pub fn transform_row(
    row: &RawRow,
    role: &str,
    household_id: Uuid,
    line_number: usize,
) -> Result<PersonRecord, RowError> {
    let (first_name, last_name) = split_name(row.name_str());

    Ok(PersonRecord {
        first_name,
        last_name,
        gender: map_gender(row.gender.as_deref())?,
        date_of_birth: normalize_date(row.dob.as_deref()),
        phone: row.phone.clone(),
        email: row.email.clone(),
        address_line1: row.address.clone(),
        address_line2: None,
        city: None,
        state: None,
        country: None,
        occupation: row.occupation.clone(),
        marital_status: map_marital_status(row.marital_status.as_deref())?
            .unwrap_or(MaritalStatus::Single),
        wedding_date: normalize_date(row.wedding_date.as_deref()),
        memorial_day: normalize_date(row.memorial.as_deref()),
        dietary_preference: map_dietary_preference(row.dietary_pref.as_deref())?,
        preferred_visiting_time: row.pref_home_visit.clone(),
        important_dates: parse_important_dates(row.dates_to_remember.as_deref(), line_number),
        membership_status: MembershipStatus::Member,
        baptism_date: normalize_date(row.baptism_date.as_deref()),
        baptism_place: row.baptism_place.clone(),
        household_id,
        household_role: map_household_role(role)?,
        is_active: true,
    })
}
