//! Record store operations for the `alerts` table.
//!
//! Mutations use `RETURNING` so that "does this id exist" and the write are
//! one statement; an empty result means the id was absent.

use chrono::{DateTime, Utc};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue, Row};
use urban_alerts_alert_models::{AlertStatus, AlertType};
use urban_alerts_database_models::{AlertFilter, AlertRow, AlertUpdate, NewAlert};

use crate::{DbError, format_timestamp, parse_timestamp};

const ALERT_COLUMNS: &str = "id, title, description, type, location, latitude, longitude, \
                             status, created_at, updated_at";

fn optional_real(value: Option<f64>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, DatabaseValue::Real64)
}

fn conversion(column: &str, e: impl std::fmt::Display) -> DbError {
    DbError::Conversion {
        message: format!("Failed to read column '{column}': {e}"),
    }
}

/// Decodes one `alerts` row.
fn alert_from_row(row: &Row) -> Result<AlertRow, DbError> {
    let alert_type: String = row.to_value("type").map_err(|e| conversion("type", e))?;
    let alert_type = alert_type
        .parse::<AlertType>()
        .map_err(|e| conversion("type", e))?;

    let status: String = row.to_value("status").map_err(|e| conversion("status", e))?;
    let status = status
        .parse::<AlertStatus>()
        .map_err(|e| conversion("status", e))?;

    let created_at: String = row
        .to_value("created_at")
        .map_err(|e| conversion("created_at", e))?;
    let updated_at: String = row
        .to_value("updated_at")
        .map_err(|e| conversion("updated_at", e))?;

    Ok(AlertRow {
        id: row.to_value("id").map_err(|e| conversion("id", e))?,
        title: row.to_value("title").map_err(|e| conversion("title", e))?,
        description: row
            .to_value("description")
            .map_err(|e| conversion("description", e))?,
        alert_type,
        location: row
            .to_value("location")
            .map_err(|e| conversion("location", e))?,
        latitude: row
            .to_value("latitude")
            .map_err(|e| conversion("latitude", e))?,
        longitude: row
            .to_value("longitude")
            .map_err(|e| conversion("longitude", e))?,
        status,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn first_or_not_found(rows: &[Row], id: i64) -> Result<AlertRow, DbError> {
    rows.first()
        .map_or(Err(DbError::NotFound { id }), alert_from_row)
}

/// Lists alerts, newest first, optionally filtered by type and/or status.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn list_alerts(db: &dyn Database, filter: &AlertFilter) -> Result<Vec<AlertRow>, DbError> {
    let mut sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE 1=1");
    let mut params: Vec<DatabaseValue> = Vec::new();

    if let Some(alert_type) = filter.alert_type {
        sql.push_str(" AND type = ?");
        params.push(DatabaseValue::String(alert_type.to_string()));
    }

    if let Some(status) = filter.status {
        sql.push_str(" AND status = ?");
        params.push(DatabaseValue::String(status.to_string()));
    }

    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let rows = db.query_raw_params(&sql, &params).await?;

    rows.iter().map(alert_from_row).collect()
}

/// Fetches a single alert by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no alert has this id, or [`DbError`] if
/// the database operation fails.
pub async fn get_alert(db: &dyn Database, id: i64) -> Result<AlertRow, DbError> {
    let rows = db
        .query_raw_params(
            &format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?"),
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    first_or_not_found(&rows, id)
}

/// Inserts a new alert in the active state, stamping both timestamps with
/// `now`.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn create_alert(
    db: &dyn Database,
    alert: &NewAlert,
    now: DateTime<Utc>,
) -> Result<AlertRow, DbError> {
    let stamp = format_timestamp(now);
    let rows = db
        .query_raw_params(
            &format!(
                "INSERT INTO alerts (
                    title, description, type, location, latitude, longitude,
                    status, created_at, updated_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING {ALERT_COLUMNS}"
            ),
            &[
                DatabaseValue::String(alert.title.clone()),
                DatabaseValue::String(alert.description.clone()),
                DatabaseValue::String(alert.alert_type.to_string()),
                DatabaseValue::String(alert.location.clone()),
                optional_real(alert.latitude),
                optional_real(alert.longitude),
                DatabaseValue::String(AlertStatus::Active.to_string()),
                DatabaseValue::String(stamp.clone()),
                DatabaseValue::String(stamp),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Insert returned no row".to_string(),
    })?;

    let created = alert_from_row(row)?;
    log::debug!("Created alert {} ({})", created.id, created.alert_type);
    Ok(created)
}

/// Sets only the status (and `updated_at`) of an existing alert.
///
/// The caller is responsible for validating that `status` is a permitted
/// transition target.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no alert has this id, or [`DbError`] if
/// the database operation fails.
pub async fn update_alert_status(
    db: &dyn Database,
    id: i64,
    status: AlertStatus,
    now: DateTime<Utc>,
) -> Result<AlertRow, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "UPDATE alerts SET status = ?, updated_at = ?
                 WHERE id = ?
                 RETURNING {ALERT_COLUMNS}"
            ),
            &[
                DatabaseValue::String(status.to_string()),
                DatabaseValue::String(format_timestamp(now)),
                DatabaseValue::Int64(id),
            ],
        )
        .await?;

    first_or_not_found(&rows, id)
}

/// Replaces every mutable column of an existing alert.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no alert has this id, or [`DbError`] if
/// the database operation fails.
pub async fn update_alert(
    db: &dyn Database,
    id: i64,
    update: &AlertUpdate,
    now: DateTime<Utc>,
) -> Result<AlertRow, DbError> {
    let rows = db
        .query_raw_params(
            &format!(
                "UPDATE alerts SET
                    title = ?, description = ?, type = ?, location = ?,
                    latitude = ?, longitude = ?, status = ?, updated_at = ?
                 WHERE id = ?
                 RETURNING {ALERT_COLUMNS}"
            ),
            &[
                DatabaseValue::String(update.title.clone()),
                DatabaseValue::String(update.description.clone()),
                DatabaseValue::String(update.alert_type.to_string()),
                DatabaseValue::String(update.location.clone()),
                optional_real(update.latitude),
                optional_real(update.longitude),
                DatabaseValue::String(update.status.to_string()),
                DatabaseValue::String(format_timestamp(now)),
                DatabaseValue::Int64(id),
            ],
        )
        .await?;

    first_or_not_found(&rows, id)
}

/// Permanently deletes an alert.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no alert has this id, or [`DbError`] if
/// the database operation fails.
pub async fn delete_alert(db: &dyn Database, id: i64) -> Result<(), DbError> {
    let rows = db
        .query_raw_params(
            "DELETE FROM alerts WHERE id = ? RETURNING id",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    if rows.is_empty() {
        return Err(DbError::NotFound { id });
    }

    log::debug!("Deleted alert {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone as _};

    use super::*;
    use crate::db::open_in_memory;

    async fn count_alerts(db: &dyn Database) -> usize {
        list_alerts(db, &AlertFilter::default()).await.unwrap().len()
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap()
    }

    fn new_alert(title: &str, alert_type: AlertType) -> NewAlert {
        NewAlert {
            title: title.to_string(),
            description: "Rua alagada perto da escola".to_string(),
            alert_type,
            location: "Av. Brasil, 100".to_string(),
            latitude: Some(-23.55),
            longitude: Some(-46.63),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_starts_active() {
        let db = open_in_memory().await.unwrap();
        let now = base_time();

        let created = create_alert(db.as_ref(), &new_alert("Enchente", AlertType::Flood), now)
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, AlertStatus::Active);
        assert_eq!(created.created_at, now);
        assert_eq!(created.updated_at, now);
        assert_eq!(created.latitude, Some(-23.55));

        let fetched = get_alert(db.as_ref(), created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_without_coordinates_stores_null() {
        let db = open_in_memory().await.unwrap();
        let mut alert = new_alert("Poste caído", AlertType::PowerOutage);
        alert.latitude = None;
        alert.longitude = None;

        let created = create_alert(db.as_ref(), &alert, base_time()).await.unwrap();
        assert_eq!(created.latitude, None);
        assert_eq!(created.longitude, None);

        let fetched = get_alert(db.as_ref(), created.id).await.unwrap();
        assert_eq!(fetched.latitude, None);
        assert_eq!(fetched.longitude, None);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let db = open_in_memory().await.unwrap();
        assert!(matches!(
            get_alert(db.as_ref(), 42).await,
            Err(DbError::NotFound { id: 42 })
        ));
    }

    #[tokio::test]
    async fn list_filters_by_type_newest_first() {
        let db = open_in_memory().await.unwrap();
        let t0 = base_time();

        let fire_old = create_alert(db.as_ref(), &new_alert("Fogo 1", AlertType::Fire), t0)
            .await
            .unwrap();
        create_alert(
            db.as_ref(),
            &new_alert("Alagamento", AlertType::Flood),
            t0 + Duration::minutes(1),
        )
        .await
        .unwrap();
        let fire_new = create_alert(
            db.as_ref(),
            &new_alert("Fogo 2", AlertType::Fire),
            t0 + Duration::minutes(2),
        )
        .await
        .unwrap();

        let filter = AlertFilter {
            alert_type: Some(AlertType::Fire),
            status: None,
        };
        let fires = list_alerts(db.as_ref(), &filter).await.unwrap();

        let ids: Vec<i64> = fires.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![fire_new.id, fire_old.id]);
        assert!(fires.iter().all(|a| a.alert_type == AlertType::Fire));

        let all = list_alerts(db.as_ref(), &AlertFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, fire_new.id);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let db = open_in_memory().await.unwrap();
        let now = base_time();

        let a = create_alert(db.as_ref(), &new_alert("A", AlertType::Crime), now)
            .await
            .unwrap();
        create_alert(db.as_ref(), &new_alert("B", AlertType::Crime), now)
            .await
            .unwrap();
        update_alert_status(db.as_ref(), a.id, AlertStatus::Resolved, now)
            .await
            .unwrap();

        let filter = AlertFilter {
            alert_type: None,
            status: Some(AlertStatus::Resolved),
        };
        let resolved = list_alerts(db.as_ref(), &filter).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, a.id);
    }

    #[tokio::test]
    async fn status_update_changes_only_status_and_updated_at() {
        let db = open_in_memory().await.unwrap();
        let created_at = base_time();
        let resolved_at = created_at + Duration::hours(3);

        let created = create_alert(
            db.as_ref(),
            &new_alert("Deslizamento", AlertType::Landslide),
            created_at,
        )
        .await
        .unwrap();

        let updated =
            update_alert_status(db.as_ref(), created.id, AlertStatus::Resolved, resolved_at)
                .await
                .unwrap();

        assert_eq!(updated.status, AlertStatus::Resolved);
        assert_eq!(updated.updated_at, resolved_at);
        assert_eq!(
            AlertRow {
                status: created.status,
                updated_at: created.updated_at,
                ..updated
            },
            created
        );
    }

    #[tokio::test]
    async fn status_update_missing_is_not_found() {
        let db = open_in_memory().await.unwrap();
        assert!(matches!(
            update_alert_status(db.as_ref(), 7, AlertStatus::Resolved, base_time()).await,
            Err(DbError::NotFound { id: 7 })
        ));
    }

    #[tokio::test]
    async fn full_update_replaces_fields_and_can_reopen() {
        let db = open_in_memory().await.unwrap();
        let now = base_time();

        let created = create_alert(db.as_ref(), &new_alert("Obra", AlertType::Roadwork), now)
            .await
            .unwrap();
        update_alert_status(db.as_ref(), created.id, AlertStatus::Resolved, now)
            .await
            .unwrap();

        let update = AlertUpdate {
            title: "Obra reaberta".to_string(),
            description: "Buraco voltou".to_string(),
            alert_type: AlertType::Accident,
            location: "Rua Augusta".to_string(),
            latitude: None,
            longitude: Some(10.0),
            status: AlertStatus::Active,
        };
        let later = now + Duration::days(1);
        let updated = update_alert(db.as_ref(), created.id, &update, later)
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Obra reaberta");
        assert_eq!(updated.alert_type, AlertType::Accident);
        assert_eq!(updated.latitude, None);
        assert_eq!(updated.longitude, Some(10.0));
        assert_eq!(updated.status, AlertStatus::Active);
        assert_eq!(updated.created_at, now);
        assert_eq!(updated.updated_at, later);
    }

    #[tokio::test]
    async fn full_update_missing_is_not_found() {
        let db = open_in_memory().await.unwrap();
        let update = AlertUpdate {
            title: "x".to_string(),
            description: "y".to_string(),
            alert_type: AlertType::Other,
            location: "z".to_string(),
            latitude: None,
            longitude: None,
            status: AlertStatus::Active,
        };
        assert!(matches!(
            update_alert(db.as_ref(), 99, &update, base_time()).await,
            Err(DbError::NotFound { id: 99 })
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let db = open_in_memory().await.unwrap();
        let created = create_alert(db.as_ref(), &new_alert("Batida", AlertType::Accident), base_time())
            .await
            .unwrap();

        delete_alert(db.as_ref(), created.id).await.unwrap();

        assert!(matches!(
            get_alert(db.as_ref(), created.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            delete_alert(db.as_ref(), created.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(count_alerts(db.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = open_in_memory().await.unwrap();
        let now = base_time();

        let first = create_alert(db.as_ref(), &new_alert("1", AlertType::Other), now)
            .await
            .unwrap();
        delete_alert(db.as_ref(), first.id).await.unwrap();
        let second = create_alert(db.as_ref(), &new_alert("2", AlertType::Other), now)
            .await
            .unwrap();

        assert!(second.id > first.id);
    }
}
