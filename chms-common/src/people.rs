//! People-domain enumerations
//!
//! Every enumeration is persisted as its snake_case string form. `VALUES`
//! lists the accepted strings in declaration order; spreadsheet and form
//! input is normalized to this form before lookup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Accepted stored values, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            /// Stored string form
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(Error::InvalidInput(format!(
                        "unknown {} value: {:?}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Gender as recorded on the person profile
    Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

string_enum! {
    /// Marital status; `Single` is assumed when the source leaves it blank
    MaritalStatus {
        Single => "single",
        Married => "married",
        Divorced => "divorced",
        Widowed => "widowed",
        Separated => "separated",
    }
}

string_enum! {
    /// Relationship of a person to the congregation
    MembershipStatus {
        Member => "member",
        RegularAttendee => "regular_attendee",
        Visitor => "visitor",
        Inactive => "inactive",
        Moved => "moved",
        Deceased => "deceased",
    }
}

string_enum! {
    /// Role of a person inside their household
    HouseholdRole {
        Head => "head",
        Spouse => "spouse",
        Child => "child",
        /// Not produced by the importer; available to manual edits
        Other => "other",
    }
}

string_enum! {
    /// Dietary preference used when planning church meals
    DietaryPreference {
        Vegan => "vegan",
        Vegetarian => "vegetarian",
        GlutenFree => "gluten_free",
        LactoseFree => "lactose_free",
        NutFree => "nut_free",
        Other => "other",
        None => "none",
    }
}

string_enum! {
    /// How often an important date comes around
    Recurrence {
        Yearly => "yearly",
        Once => "once",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_through_from_str() {
        for value in MembershipStatus::VALUES {
            let parsed: MembershipStatus = value.parse().unwrap();
            assert_eq!(parsed.as_str(), *value);
        }
        for value in DietaryPreference::VALUES {
            let parsed: DietaryPreference = value.parse().unwrap();
            assert_eq!(parsed.to_string(), *value);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "cousin".parse::<HouseholdRole>().unwrap_err();
        assert!(err.to_string().contains("HouseholdRole"));
        assert!(err.to_string().contains("cousin"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MembershipStatus::RegularAttendee).unwrap();
        assert_eq!(json, "\"regular_attendee\"");
        let back: DietaryPreference = serde_json::from_str("\"gluten_free\"").unwrap();
        assert_eq!(back, DietaryPreference::GlutenFree);
    }
}
