#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the urban alerts server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract. Request bodies are deliberately loose (`serde_json::Value`
//! per field) so that a wrongly typed field is reported as a field-level
//! validation error rather than a body parse failure; see [`validation`].

pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use urban_alerts_alert_models::{AlertStatus, AlertType};
use urban_alerts_database_models::{AlertFilter, AlertRow};

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    /// Attaches a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A failed response with only a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }

    /// A failed response listing field-level validation errors.
    #[must_use]
    pub const fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            errors: Some(errors),
        }
    }
}

/// A single field-level validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Always `"field"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The value that was rejected (`null` when absent).
    pub value: serde_json::Value,
    /// What is wrong with it.
    pub msg: String,
    /// Name of the offending field.
    pub path: String,
    /// Where the field came from. Always `"body"`.
    pub location: String,
}

impl FieldError {
    /// Creates an error for body field `path`.
    #[must_use]
    pub fn body(path: &str, value: Option<&serde_json::Value>, msg: &str) -> Self {
        Self {
            kind: "field".to_string(),
            value: value.cloned().unwrap_or(serde_json::Value::Null),
            msg: msg.to_string(),
            path: path.to_string(),
            location: "body".to_string(),
        }
    }
}

/// An alert as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAlert {
    /// Unique alert ID.
    pub id: i64,
    /// Short headline.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Incident type.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Free-text location.
    pub location: String,
    /// Latitude, `null` when not given.
    pub latitude: Option<f64>,
    /// Longitude, `null` when not given.
    pub longitude: Option<f64>,
    /// Lifecycle state.
    pub status: AlertStatus,
    /// When the alert was created (RFC 3339).
    pub created_at: DateTime<Utc>,
    /// When the alert was last changed (RFC 3339).
    pub updated_at: DateTime<Utc>,
}

impl From<AlertRow> for ApiAlert {
    fn from(row: AlertRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            alert_type: row.alert_type,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertListParams {
    /// Alert type wire name.
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    /// Alert status wire name.
    pub status: Option<String>,
}

impl AlertListParams {
    /// Collects the list parameters from raw query pairs.
    ///
    /// A key that appears more than once has no single value and is
    /// dropped, like any other unusable filter. Unrelated keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let single = |key: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(value), None) => Some(value.clone()),
                _ => None,
            }
        };

        Self {
            alert_type: single("type"),
            status: single("status"),
        }
    }

    /// Converts the raw parameters into a store filter.
    ///
    /// Values that are not a known type or status are dropped, so a bad
    /// filter lists everything instead of failing.
    #[must_use]
    pub fn to_filter(&self) -> AlertFilter {
        AlertFilter {
            alert_type: self
                .alert_type
                .as_deref()
                .and_then(|t| t.parse::<AlertType>().ok()),
            status: self
                .status
                .as_deref()
                .and_then(|s| s.parse::<AlertStatus>().ok()),
        }
    }
}

/// Body of the create endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAlertBody {
    /// Short headline.
    pub title: Option<serde_json::Value>,
    /// Free-text description.
    pub description: Option<serde_json::Value>,
    /// Alert type wire name.
    #[serde(rename = "type")]
    pub alert_type: Option<serde_json::Value>,
    /// Free-text location.
    pub location: Option<serde_json::Value>,
    /// Latitude as a number or numeric string.
    pub latitude: Option<serde_json::Value>,
    /// Longitude as a number or numeric string.
    pub longitude: Option<serde_json::Value>,
}

/// Body of the full update endpoint: every create field plus `status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAlertBody {
    /// Same fields as on create.
    #[serde(flatten)]
    pub fields: CreateAlertBody,
    /// Alert status wire name.
    pub status: Option<serde_json::Value>,
}

/// Body of the status-transition endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusBody {
    /// Requested status wire name.
    pub status: Option<serde_json::Value>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// Always `"ok"` when the server is answering.
    pub status: String,
    /// Server time (RFC 3339).
    pub timestamp: DateTime<Utc>,
    /// Service version.
    pub version: String,
}
