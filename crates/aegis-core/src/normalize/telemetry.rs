use serde_json::Value;

use super::fields::telemetry as f;
use super::record::Record;
use crate::model::{TelemetryRow, TimeseriesRow};

pub fn normalize_telemetry_row(raw: &Value) -> TelemetryRow {
    let r = Record::new(raw);
    TelemetryRow {
        product_id: r.string(&f::PRODUCT_ID),
        unit_id: r.string(&f::UNIT_ID),
        timestamp: r.timestamp(&f::TIMESTAMP),
        step_index: r.integer(&f::STEP_INDEX),
        air_temperature_k: r.number(&f::AIR_TEMPERATURE_K),
        process_temperature_k: r.number(&f::PROCESS_TEMPERATURE_K),
        rotational_speed_rpm: r.number(&f::ROTATIONAL_SPEED_RPM),
        torque_nm: r.number(&f::TORQUE_NM),
        tool_wear_min: r.number(&f::TOOL_WEAR_MIN),
        is_failure: r.boolean(&f::IS_FAILURE),
        failure_type: r.string(&f::FAILURE_TYPE),
        synthetic_rul: r.number(&f::SYNTHETIC_RUL),
        avg_process_temperature_k: r.number(&f::AVG_PROCESS_TEMPERATURE_K),
        avg_rotational_speed_rpm: r.number(&f::AVG_ROTATIONAL_SPEED_RPM),
        avg_torque_nm: r.number(&f::AVG_TORQUE_NM),
        avg_tool_wear_min: r.number(&f::AVG_TOOL_WEAR_MIN),
        avg_synthetic_rul: r.number(&f::AVG_SYNTHETIC_RUL),
    }
}

pub fn normalize_timeseries_row(raw: &Value) -> TimeseriesRow {
    let r = Record::new(raw);
    TimeseriesRow {
        timestamp: r.timestamp(&f::TIMESTAMP),
        avg_process_temperature_k: r.number(&f::AVG_PROCESS_TEMPERATURE_K),
        avg_rotational_speed_rpm: r.number(&f::AVG_ROTATIONAL_SPEED_RPM),
        avg_torque_nm: r.number(&f::AVG_TORQUE_NM),
        avg_tool_wear_min: r.number(&f::AVG_TOOL_WEAR_MIN),
        avg_synthetic_rul: r.number(&f::AVG_SYNTHETIC_RUL),
    }
}

/// Timeseries endpoints answer with a bare array or a `{ data: [...] }`
/// envelope.
pub fn normalize_timeseries(raw: &Value) -> Vec<TimeseriesRow> {
    super::rows(raw).iter().map(normalize_timeseries_row).collect()
}
