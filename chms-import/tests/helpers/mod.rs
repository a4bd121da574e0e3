//! Test Helper Utilities
//!
//! Shared utilities for testing chms-import

#![allow(dead_code)]

use chms_common::db::init_database;
use chms_import::source::{RawRow, COLUMNS};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary database with the full schema
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_database(&temp_dir.path().join("test_chms.db"))
        .await
        .unwrap();
    (temp_dir, pool)
}

/// Minimal row: name plus household columns
pub fn person(name: &str, family: &str, relation: &str) -> RawRow {
    RawRow {
        name: cell(name),
        family: cell(family),
        relation: cell(relation),
        ..Default::default()
    }
}

fn cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// CSV text with the full header followed by `records` (already joined)
pub fn csv_text(records: &[&str]) -> String {
    let mut text = COLUMNS.join(",");
    for record in records {
        text.push('\n');
        text.push_str(record);
    }
    text.push('\n');
    text
}

/// Write `content` into the temp dir and return its path
pub fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("members.csv");
    std::fs::write(&path, content).unwrap();
    path
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
