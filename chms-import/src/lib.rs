//! chms-import library interface
//!
//! CSV membership import: read the spreadsheet, validate rows, group them
//! into households and write each household atomically. Also hosts the
//! important-dates backfill.

pub mod backfill;
pub mod db;
pub mod error;
pub mod household;
pub mod normalize;
pub mod orchestrator;
pub mod source;
pub mod summary;
pub mod transform;
pub mod validator;

pub use crate::backfill::{backfill_important_dates, BackfillReport};
pub use crate::error::{ImportError, ImportResult, RowError};
pub use crate::orchestrator::{import_file, run_import, ImportOptions};
pub use crate::summary::{FailedRow, ImportSummary};
