#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Alert row types and query parameter definitions.
//!
//! These types represent the shapes of data as stored in and retrieved from
//! the `alerts` table. They are distinct from the API request and response
//! types in `urban_alerts_server_models`, which carry unvalidated input and
//! the JSON envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urban_alerts_alert_models::{AlertStatus, AlertType};

/// Equality filters for listing alerts. `None` means "don't filter".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    /// Only return alerts of this type.
    pub alert_type: Option<AlertType>,
    /// Only return alerts in this lifecycle state.
    pub status: Option<AlertStatus>,
}

/// Validated fields for inserting a new alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    /// Short headline, at most 150 characters.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Incident type.
    pub alert_type: AlertType,
    /// Free-text location (street, neighbourhood, landmark).
    pub location: String,
    /// Latitude (WGS84), within [-90, 90].
    pub latitude: Option<f64>,
    /// Longitude (WGS84), within [-180, 180].
    pub longitude: Option<f64>,
}

/// Validated fields for a full replacement of an alert's mutable columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertUpdate {
    /// Short headline, at most 150 characters.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Incident type.
    pub alert_type: AlertType,
    /// Free-text location.
    pub location: String,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Lifecycle state. Unconstrained: a full update may reopen an alert.
    pub status: AlertStatus,
}

/// An alert row as retrieved from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRow {
    /// Primary key, assigned on insert and never reused.
    pub id: i64,
    /// Short headline.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Incident type.
    pub alert_type: AlertType,
    /// Free-text location.
    pub location: String,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Lifecycle state.
    pub status: AlertStatus,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
    /// When the alert was last mutated.
    pub updated_at: DateTime<Utc>,
}
