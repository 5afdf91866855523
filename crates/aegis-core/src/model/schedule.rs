// ── Maintenance schedule domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle of a maintenance schedule.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScheduleStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    #[default]
    Unknown,
}

impl ScheduleStatus {
    /// Lenient parse: accepts `IN_PROGRESS`, `in-progress`, `In Progress`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let canonical = raw.trim().replace(['-', ' '], "_");
        canonical.parse().ok()
    }
}

/// Urgency derived from the schedule's 0–1 risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchedulePriority {
    #[default]
    Low,
    Medium,
    High,
}

impl SchedulePriority {
    /// ≥0.8 high, ≥0.5 medium, else low (absent scores read as low).
    pub fn from_risk(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 0.8 => Self::High,
            Some(s) if s >= 0.5 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A recommended maintenance window produced by the prediction model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub schedule_id: Option<String>,
    pub unit_id: Option<String>,
    pub product_id: Option<String>,
    /// 0–1 probability.
    pub risk_score: Option<f64>,
    pub priority: SchedulePriority,
    pub status: ScheduleStatus,
    pub recommended_start: Option<DateTime<Utc>>,
    pub recommended_end: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub actions: Vec<String>,
    pub model_version: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
