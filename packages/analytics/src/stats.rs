//! Dashboard aggregate queries.
//!
//! Each function is one query. [`compute_stats`] issues all four at once;
//! there is no snapshot isolation between them.

use chrono::{DateTime, Duration, Utc};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue, Row};
use urban_alerts_alert_models::{AlertStatus, AlertType};
use urban_alerts_analytics_models::{
    AlertStats, DailyCount, RECENT_WINDOW_HOURS, StatusCount, TIMELINE_WINDOW_DAYS, TypeCount,
};
use urban_alerts_database::format_timestamp;

use crate::AnalyticsError;

fn read_count(row: &Row) -> Result<u64, AnalyticsError> {
    let count: i64 = row.to_value("count").map_err(|e| AnalyticsError::Conversion {
        message: format!("Failed to read count: {e}"),
    })?;
    u64::try_from(count).map_err(|e| AnalyticsError::Conversion {
        message: format!("Negative count {count}: {e}"),
    })
}

fn read_string(row: &Row, column: &str) -> Result<String, AnalyticsError> {
    row.to_value(column).map_err(|e| AnalyticsError::Conversion {
        message: format!("Failed to read {column}: {e}"),
    })
}

/// Counts alerts per type, highest count first. Types with no alerts are
/// absent.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails or a stored type is not
/// recognised.
pub async fn counts_by_type(db: &dyn Database) -> Result<Vec<TypeCount>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT type, COUNT(*) AS count
             FROM alerts
             GROUP BY type
             ORDER BY count DESC, type ASC",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let name = read_string(row, "type")?;
            let alert_type = name
                .parse::<AlertType>()
                .map_err(|e| AnalyticsError::Conversion {
                    message: format!("Unknown alert type '{name}': {e}"),
                })?;
            Ok(TypeCount {
                alert_type,
                count: read_count(row)?,
            })
        })
        .collect()
}

/// Counts alerts per lifecycle state. States with no alerts are absent.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails or a stored status is not
/// recognised.
pub async fn counts_by_status(db: &dyn Database) -> Result<Vec<StatusCount>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT status, COUNT(*) AS count
             FROM alerts
             GROUP BY status
             ORDER BY status ASC",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let name = read_string(row, "status")?;
            let status = name
                .parse::<AlertStatus>()
                .map_err(|e| AnalyticsError::Conversion {
                    message: format!("Unknown alert status '{name}': {e}"),
                })?;
            Ok(StatusCount {
                status,
                count: read_count(row)?,
            })
        })
        .collect()
}

/// Counts alerts created within the trailing `window_hours` before `now`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub async fn recent_count(
    db: &dyn Database,
    now: DateTime<Utc>,
    window_hours: i64,
) -> Result<u64, AnalyticsError> {
    let since = now - Duration::hours(window_hours);

    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) AS count FROM alerts WHERE created_at >= ?",
            &[DatabaseValue::String(format_timestamp(since))],
        )
        .await?;

    rows.first().map_or(Ok(0), read_count)
}

/// Returns per-day creation counts over the trailing `window_days` before
/// `now`, ascending by day.
///
/// The series is sparse: a day appears only if at least one alert was
/// created on it.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub async fn daily_timeline(
    db: &dyn Database,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<Vec<DailyCount>, AnalyticsError> {
    let since = now - Duration::days(window_days);

    // Stored timestamps are fixed-width UTC text, so the first ten
    // characters are the calendar day.
    let rows = db
        .query_raw_params(
            "SELECT substr(created_at, 1, 10) AS day, COUNT(*) AS count
             FROM alerts
             WHERE created_at >= ?
             GROUP BY day
             ORDER BY day ASC",
            &[DatabaseValue::String(format_timestamp(since))],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DailyCount {
                day: read_string(row, "day")?,
                count: read_count(row)?,
            })
        })
        .collect()
}

/// Computes all four dashboard aggregates concurrently and combines them.
///
/// # Errors
///
/// Returns the first [`AnalyticsError`] raised by any of the sub-queries.
pub async fn compute_stats(
    db: &dyn Database,
    now: DateTime<Utc>,
) -> Result<AlertStats, AnalyticsError> {
    let (by_type, by_status, recent_24h, timeline) = tokio::try_join!(
        counts_by_type(db),
        counts_by_status(db),
        recent_count(db, now, RECENT_WINDOW_HOURS),
        daily_timeline(db, now, TIMELINE_WINDOW_DAYS),
    )?;

    log::debug!(
        "Computed stats: {} types, {} statuses, {recent_24h} recent, {} timeline days",
        by_type.len(),
        by_status.len(),
        timeline.len()
    );

    Ok(AlertStats {
        by_type,
        by_status,
        recent_24h,
        timeline,
    })
}
