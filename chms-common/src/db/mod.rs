//! Database bootstrap, models and error classification

pub mod errors;
pub mod init;
pub mod models;

pub use errors::*;
pub use init::*;
pub use models::*;
