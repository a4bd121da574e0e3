//! # CHMS Common Library
//!
//! Shared code for the church membership tools:
//! - Configuration loading (TOML + environment + compiled defaults)
//! - SQLite bootstrap and persisted model types
//! - People-domain enumerations (gender, marital status, roles, ...)
//! - Storage error classification

pub mod config;
pub mod db;
pub mod error;
pub mod people;

pub use error::{Error, Result};
