// ── Risk prediction domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Severity band of a risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a 0–100 score: >70 critical, 50–70 high, 30–49 medium, else low.
    pub fn from_score(score: u8) -> Self {
        match score {
            71.. => Self::Critical,
            50..=70 => Self::High,
            30..=49 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// AI risk assessment for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPrediction {
    pub machine_id: String,
    pub machine_name: String,
    pub product_id: Option<String>,
    /// 0–100.
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub primary_risk: String,
    /// Percent chance of failure in the prediction horizon.
    pub failure_probability: u8,
    pub time_to_failure: String,
    pub trend: String,
    pub schedule_id: Option<String>,
    pub recommended_start: Option<DateTime<Utc>>,
    pub recommended_end: Option<DateTime<Utc>>,
    pub status: String,
}

/// Count of machines per risk band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl RiskSummary {
    pub fn total(&self) -> u64 {
        self.critical + self.high + self.medium + self.low
    }
}

/// `GET /dashboard/risk-predictions`, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskOverview {
    pub predictions: Vec<RiskPrediction>,
    pub summary: RiskSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_scores() {
        assert_eq!(RiskLevel::from_score(71), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::Low);
    }

    #[test]
    fn banding_over_full_range() {
        for s in 0u8..=100 {
            let expected = if s > 70 {
                RiskLevel::Critical
            } else if s >= 50 {
                RiskLevel::High
            } else if s >= 30 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            assert_eq!(RiskLevel::from_score(s), expected, "score {s}");
        }
    }
}
