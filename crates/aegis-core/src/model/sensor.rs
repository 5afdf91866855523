use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sample of a machine's sensor history.
///
/// `vibration` and `current` are display aliases that fall back to the
/// rotational speed and torque channels when the backend omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub vibration: Option<f64>,
    pub temperature_c: Option<f64>,
    pub current: Option<f64>,
    pub rotational_speed_rpm: Option<f64>,
    pub process_temperature_k: Option<f64>,
    pub air_temperature_k: Option<f64>,
    pub torque_nm: Option<f64>,
    pub tool_wear_min: Option<f64>,
    #[serde(rename = "syntheticRUL")]
    pub synthetic_rul: Option<f64>,
}
