#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Alert type taxonomy and status lifecycle definitions.
//!
//! This crate defines the fixed set of incident types an alert can be
//! tagged with and the two lifecycle states it moves through. The string
//! forms (`enchente`, `ativo`, ...) are the values stored in the database
//! and exchanged over the API.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of urban incident being reported.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AlertType {
    /// Flooding of streets or buildings
    #[serde(rename = "enchente")]
    #[strum(serialize = "enchente")]
    Flood,
    /// Landslide or slope collapse
    #[serde(rename = "deslizamento")]
    #[strum(serialize = "deslizamento")]
    Landslide,
    /// Fire
    #[serde(rename = "incendio")]
    #[strum(serialize = "incendio")]
    Fire,
    /// Traffic accident
    #[serde(rename = "acidente")]
    #[strum(serialize = "acidente")]
    Accident,
    /// Roadwork or construction blocking the way
    #[serde(rename = "obra")]
    #[strum(serialize = "obra")]
    Roadwork,
    /// Criminal activity
    #[serde(rename = "criminalidade")]
    #[strum(serialize = "criminalidade")]
    Crime,
    /// Power outage
    #[serde(rename = "falta_energia")]
    #[strum(serialize = "falta_energia")]
    PowerOutage,
    /// Anything not covered above
    #[serde(rename = "outros")]
    #[strum(serialize = "outros")]
    Other,
}

impl AlertType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Flood,
            Self::Landslide,
            Self::Fire,
            Self::Accident,
            Self::Roadwork,
            Self::Crime,
            Self::PowerOutage,
            Self::Other,
        ]
    }
}

/// Lifecycle state of an alert.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AlertStatus {
    /// The incident is ongoing. Every alert starts here.
    #[default]
    #[serde(rename = "ativo")]
    #[strum(serialize = "ativo")]
    Active,
    /// The incident has been dealt with.
    #[serde(rename = "resolvido")]
    #[strum(serialize = "resolvido")]
    Resolved,
}

impl AlertStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Active, Self::Resolved]
    }

    /// Parses the status requested through the dedicated status-transition
    /// operation.
    ///
    /// Only [`AlertStatus::Resolved`] is a valid target: the lifecycle runs
    /// one way, and moving an alert back to active is only possible through
    /// a full update.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransitionError`] if `requested` is anything other
    /// than `resolvido`.
    pub fn transition_target(requested: &str) -> Result<Self, InvalidTransitionError> {
        match requested.parse::<Self>() {
            Ok(Self::Resolved) => Ok(Self::Resolved),
            _ => Err(InvalidTransitionError {
                requested: requested.to_string(),
            }),
        }
    }
}

/// Error returned when the status-transition operation is asked for a
/// target other than `resolvido`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransitionError {
    /// The status string that was requested.
    pub requested: String,
}

impl std::fmt::Display for InvalidTransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status transition to '{}': expected {}",
            self.requested,
            AlertStatus::Resolved
        )
    }
}

impl std::error::Error for InvalidTransitionError {}
