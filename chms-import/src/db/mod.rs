//! Database access for chms-import
//!
//! Insert and lookup helpers for the households and people tables. Inserts
//! take a bare connection so the orchestrator can run them inside a
//! per-household transaction; lookups take the pool.

pub mod households;
pub mod people;

pub use households::*;
pub use people::*;

use uuid::Uuid;

/// Parse a TEXT id column
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
