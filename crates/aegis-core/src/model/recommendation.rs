use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An AI maintenance recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub machine_id: Option<String>,
    pub machine_type: Option<String>,
    pub severity: Option<String>,
    pub prediction: Option<String>,
    pub timeframe: Option<String>,
    /// Model confidence, as reported (percentage).
    pub confidence: Option<f64>,
    pub details: Option<String>,
    pub recommended_actions: Vec<String>,
    pub estimated_downtime: Option<String>,
    pub recommended_start: Option<DateTime<Utc>>,
    pub recommended_end: Option<DateTime<Utc>>,
    /// Sensor readings at prediction time, keys camelCased.
    pub current_metrics: Map<String, Value>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub ai_model: Option<String>,
}
