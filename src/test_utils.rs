//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        label,
        record::{self, NewRecord},
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses an RFC 3339 timestamp, keeping its offset.
pub fn at_offset(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Parses an RFC 3339 timestamp and converts it to UTC.
pub fn utc(rfc3339: &str) -> DateTime<Utc> {
    at_offset(rfc3339).with_timezone(&Utc)
}

/// Creates a test label with no category.
pub async fn create_test_label(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::label::Model> {
    label::create_label(db, name, None).await
}

/// Creates a test record.
///
/// # Arguments
/// * `db` - Database connection
/// * `timestamp` - RFC 3339 timestamp, any offset
/// * `amount` - Amount text
/// * `label_id` - Associated label ID
pub async fn create_test_record(
    db: &DatabaseConnection,
    timestamp: &str,
    amount: &str,
    label_id: i64,
) -> Result<entities::record::Model> {
    record::create_record(
        db,
        NewRecord {
            timestamp: utc(timestamp),
            amount: amount.to_string(),
            label_id,
        },
    )
    .await
}

/// Sets up a complete test environment with a `"Food"` label.
/// Returns (db, label) for common test scenarios.
pub async fn setup_with_label() -> Result<(DatabaseConnection, entities::label::Model)> {
    let db = setup_test_db().await?;
    let label = create_test_label(&db, "Food").await?;
    Ok((db, label))
}
