// ── Machine domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Health classification of a machine.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MachineStatus {
    Healthy,
    Warning,
    Critical,
    #[default]
    Unknown,
}

impl MachineStatus {
    /// Classify by health percentage: ≥80 healthy, ≥50 warning, else critical.
    pub fn from_health(health: f64) -> Self {
        if health >= 80.0 {
            Self::Healthy
        } else if health >= 50.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    /// Classify by remaining useful life in days: <30 critical, ≤90 warning.
    pub fn from_rul(rul: f64) -> Self {
        if rul < 30.0 {
            Self::Critical
        } else if rul <= 90.0 {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Health percentage implied by a remaining-useful-life estimate.
///
/// 200 days of RUL or more reads as 100 %.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
pub fn health_from_rul(rul: f64) -> u8 {
    (rul / 200.0 * 100.0).round().clamp(0.0, 100.0) as u8
}

/// A monitored machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub unit_id: String,
    pub product_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub machine_type: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub health_percent: Option<u8>,
    /// Remaining useful life, in days.
    #[serde(rename = "syntheticRUL")]
    pub synthetic_rul: Option<f64>,
    pub status: MachineStatus,
    pub install_date: Option<DateTime<Utc>>,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub process_temperature_k: Option<f64>,
    pub rotational_speed_rpm: Option<f64>,
    pub tool_wear_min: Option<f64>,
    pub is_failure: bool,
}

impl Machine {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Machine {}", self.unit_id),
        }
    }
}
