#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate statistics types for the alert dashboard.
//!
//! These are serialized as-is into the `data` field of the statistics
//! endpoint, so field names follow the dashboard's camelCase contract.

use serde::{Deserialize, Serialize};
use urban_alerts_alert_models::{AlertStatus, AlertType};

/// Default trailing window for the "recent alerts" counter.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Default trailing window for the daily timeline.
pub const TIMELINE_WINDOW_DAYS: i64 = 7;

/// Number of alerts of a single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    /// Alert type.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Number of alerts.
    pub count: u64,
}

/// Number of alerts in a single lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Lifecycle state.
    pub status: AlertStatus,
    /// Number of alerts.
    pub count: u64,
}

/// Number of alerts created on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// Day as `YYYY-MM-DD`.
    pub day: String,
    /// Number of alerts created that day.
    pub count: u64,
}

/// The four dashboard aggregates, computed together.
///
/// Each part reflects the store at the moment its own query ran; under
/// concurrent writes they may disagree slightly with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    /// Counts per type, highest first.
    pub by_type: Vec<TypeCount>,
    /// Counts per status.
    pub by_status: Vec<StatusCount>,
    /// Alerts created in the last [`RECENT_WINDOW_HOURS`] hours.
    #[serde(rename = "recent24h")]
    pub recent_24h: u64,
    /// Daily counts over the last [`TIMELINE_WINDOW_DAYS`] days, ascending.
    /// Days without alerts are omitted.
    pub timeline: Vec<DailyCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_with_dashboard_field_names() {
        let stats = AlertStats {
            by_type: vec![TypeCount {
                alert_type: AlertType::Flood,
                count: 3,
            }],
            by_status: vec![StatusCount {
                status: AlertStatus::Active,
                count: 3,
            }],
            recent_24h: 2,
            timeline: vec![DailyCount {
                day: "2026-05-04".to_string(),
                count: 3,
            }],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "byType": [{ "type": "enchente", "count": 3 }],
                "byStatus": [{ "status": "ativo", "count": 3 }],
                "recent24h": 2,
                "timeline": [{ "day": "2026-05-04", "count": 3 }],
            })
        );
    }
}
