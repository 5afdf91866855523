// ── Telemetry domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw or aggregated telemetry row from `/telemetry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRow {
    pub product_id: Option<String>,
    pub unit_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub step_index: Option<i64>,
    pub air_temperature_k: Option<f64>,
    pub process_temperature_k: Option<f64>,
    pub rotational_speed_rpm: Option<f64>,
    pub torque_nm: Option<f64>,
    pub tool_wear_min: Option<f64>,
    pub is_failure: Option<bool>,
    pub failure_type: Option<String>,
    #[serde(rename = "syntheticRUL")]
    pub synthetic_rul: Option<f64>,
    pub avg_process_temperature_k: Option<f64>,
    pub avg_rotational_speed_rpm: Option<f64>,
    pub avg_torque_nm: Option<f64>,
    pub avg_tool_wear_min: Option<f64>,
    #[serde(rename = "avgSyntheticRUL")]
    pub avg_synthetic_rul: Option<f64>,
}

/// One bucket of a machine's averaged sensor series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesRow {
    pub timestamp: Option<DateTime<Utc>>,
    pub avg_process_temperature_k: Option<f64>,
    pub avg_rotational_speed_rpm: Option<f64>,
    pub avg_torque_nm: Option<f64>,
    pub avg_tool_wear_min: Option<f64>,
    #[serde(rename = "avgSyntheticRUL")]
    pub avg_synthetic_rul: Option<f64>,
}
