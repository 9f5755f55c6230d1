#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Alert record store: connection, schema bootstrap and queries.
//!
//! Uses `switchy_database` over `SQLite` with raw parameterised SQL via
//! `query_raw_params()`. Every mutation is a single statement with a
//! `RETURNING` clause, so the existence check and the write happen
//! atomically inside the store.

pub mod db;
pub mod queries;

use chrono::{DateTime, Utc};
use switchy_database::Database;
use urban_alerts_alert_models::{AlertStatus, AlertType};

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The database file could not be opened.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// No alert exists with the given id.
    #[error("Alert {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Storage format for timestamps.
///
/// Fixed width and always UTC, so lexicographic order matches chronological
/// order and the first ten characters are the calendar day.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Formats a timestamp the way it is stored in the `alerts` table.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp stored in the `alerts` table.
///
/// # Errors
///
/// Returns [`DbError::Conversion`] if the value is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::Conversion {
            message: format!("Invalid timestamp '{value}': {e}"),
        })
}

fn sql_string_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Creates the `alerts` table and its indexes if they don't already exist.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    let types: Vec<&str> = AlertType::all().iter().map(AsRef::as_ref).collect();
    let statuses: Vec<&str> = AlertStatus::all().iter().map(AsRef::as_ref).collect();

    db.exec_raw(&format!(
        "CREATE TABLE IF NOT EXISTS alerts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 150),
            description TEXT NOT NULL,
            type        TEXT NOT NULL CHECK (type IN ({types})),
            location    TEXT NOT NULL,
            latitude    REAL CHECK (latitude IS NULL OR latitude BETWEEN -90 AND 90),
            longitude   REAL CHECK (longitude IS NULL OR longitude BETWEEN -180 AND 180),
            status      TEXT NOT NULL DEFAULT '{active}' CHECK (status IN ({statuses})),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )",
        types = sql_string_list(&types),
        statuses = sql_string_list(&statuses),
        active = AlertStatus::Active,
    ))
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_alerts_created_at ON alerts (created_at)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_alerts_type ON alerts (type)")
        .await?;
    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_alerts_status ON alerts (status)")
        .await?;

    log::debug!("Alert schema is up to date");
    Ok(())
}
