//! Database models

use crate::people::{
    DietaryPreference, Gender, HouseholdRole, MaritalStatus, MembershipStatus, Recurrence,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a person's `important_dates` JSON column
///
/// Rows written before entries carried an id and a recurrence still
/// deserialize; both fields are then `None` until backfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl ImportantDate {
    /// New yearly entry with a fresh id
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            date,
            name: name.into(),
            recurrence: Some(Recurrence::Yearly),
        }
    }

    pub fn needs_backfill(&self) -> bool {
        self.id.is_none() || self.recurrence.is_none()
    }
}

/// Household row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHousehold {
    pub name: String,
}

/// Insert-ready person row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    // Basic info
    pub first_name: String,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,

    // Contact
    pub phone: Option<String>,
    pub email: Option<String>,

    // Address
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    // Personal details
    pub occupation: Option<String>,
    pub marital_status: MaritalStatus,
    pub wedding_date: Option<NaiveDate>,
    pub memorial_day: Option<NaiveDate>,
    pub dietary_preference: Option<DietaryPreference>,
    pub preferred_visiting_time: Option<String>,
    pub important_dates: Vec<ImportantDate>,

    // Church
    pub membership_status: MembershipStatus,
    pub baptism_date: Option<NaiveDate>,
    pub baptism_place: Option<String>,
    pub household_id: Uuid,
    pub household_role: HouseholdRole,
    pub is_active: bool,
}

impl PersonRecord {
    /// Display name as it appears in reports
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}
