//! Error types for chms-import
//!
//! Two tiers:
//! - [`RowError`]: aborts the current household group. The orchestrator
//!   rolls the group's transaction back and records one failure per member.
//! - [`ImportError`]: the run cannot start (unreadable file, bad header,
//!   database bootstrap). Surfaces from `main` as a non-zero exit.

use chms_common::db::classify_storage_error;
use std::path::PathBuf;
use thiserror::Error;

/// Group-fatal error raised while transforming or persisting a row
#[derive(Debug, Error)]
pub enum RowError {
    /// Enum-backed column holds a value outside its allowed set
    #[error("Invalid {field} value: \"{value}\"")]
    InvalidEnumValue { field: &'static str, value: String },

    /// Relation column is not head/spouse/child/individual
    #[error("Invalid relation/role: \"{0}\"")]
    InvalidRelation(String),

    /// Insert failed (constraint violation, lost connection, ...)
    #[error("{}", classify_storage_error(.0))]
    Storage(#[from] sqlx::Error),

    /// JSON column could not be encoded
    #[error("Failed to encode {column}: {source}")]
    Encode {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Run-level error; nothing has been imported when this is returned
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error(transparent)]
    Common(#[from] chms_common::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
