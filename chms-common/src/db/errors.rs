//! Storage error classification
//!
//! Turns raw sqlx errors into a kind plus an operator-readable message.
//! Used wherever a database failure ends up in a report rather than a log.

use serde::Serialize;
use sqlx::error::ErrorKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    /// Duplicate value in a unique column or index
    UniqueViolation,
    /// Referenced row does not exist
    ForeignKeyViolation,
    /// Required column left empty
    NotNullViolation,
    /// Value outside a CHECK constraint
    CheckViolation,
    /// Connection could not be obtained or was lost
    Unavailable,
    Other,
}

/// Classified storage failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageErrorInfo {
    pub kind: StorageErrorKind,
    pub message: String,
    /// Driver detail, e.g. `UNIQUE constraint failed: people.email`
    pub detail: Option<String>,
}

impl fmt::Display for StorageErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({})", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

pub fn classify_storage_error(err: &sqlx::Error) -> StorageErrorInfo {
    match err {
        sqlx::Error::Database(db_err) => {
            let detail = Some(db_err.message().to_string());
            let (kind, message) = match db_err.kind() {
                ErrorKind::UniqueViolation => (
                    StorageErrorKind::UniqueViolation,
                    "A duplicate entry was found for a unique field.",
                ),
                ErrorKind::ForeignKeyViolation => (
                    StorageErrorKind::ForeignKeyViolation,
                    "A foreign key violation occurred. The record you are trying to link does not exist.",
                ),
                ErrorKind::NotNullViolation => (
                    StorageErrorKind::NotNullViolation,
                    "A required field is missing.",
                ),
                ErrorKind::CheckViolation => (
                    StorageErrorKind::CheckViolation,
                    "A check constraint was violated.",
                ),
                _ => (StorageErrorKind::Other, "A database error occurred."),
            };
            StorageErrorInfo {
                kind,
                message: message.to_string(),
                detail,
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageErrorInfo {
                kind: StorageErrorKind::Unavailable,
                message: "Database connection failed. The database may be unavailable."
                    .to_string(),
                detail: Some(err.to_string()),
            }
        }
        other => StorageErrorInfo {
            kind: StorageErrorKind::Other,
            message: format!("A database error occurred: {}", other),
            detail: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        let info = classify_storage_error(&sqlx::Error::PoolTimedOut);
        assert_eq!(info.kind, StorageErrorKind::Unavailable);
        assert!(info.to_string().starts_with("Database connection failed"));
    }

    #[test]
    fn row_not_found_falls_through_to_other() {
        let info = classify_storage_error(&sqlx::Error::RowNotFound);
        assert_eq!(info.kind, StorageErrorKind::Other);
        assert!(info.detail.is_none());
    }
}
