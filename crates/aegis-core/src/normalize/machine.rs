use serde_json::Value;

use super::fields::{machine as f, sensor as s};
use super::record::{Record, percent};
use crate::model::machine::health_from_rul;
use crate::model::{Machine, MachineStatus, SensorPoint};

/// Status resolution: a recognised supplied status wins, then the
/// supplied health percentage, then remaining useful life.
pub fn derive_status(
    supplied: Option<&str>,
    health: Option<u8>,
    rul: Option<f64>,
) -> MachineStatus {
    supplied
        .and_then(|raw| raw.trim().parse::<MachineStatus>().ok())
        .filter(|status| status.is_known())
        .or_else(|| health.map(|h| MachineStatus::from_health(f64::from(h))))
        .or_else(|| rul.map(MachineStatus::from_rul))
        .unwrap_or_default()
}

pub fn normalize_machine(raw: &Value) -> Machine {
    let r = Record::new(raw);

    let rul = r.number(&f::SYNTHETIC_RUL).map(|v| v.max(0.0));
    let supplied_health = r.number(&f::HEALTH_PERCENT).map(percent);
    let status = derive_status(r.string(&f::STATUS).as_deref(), supplied_health, rul);

    Machine {
        unit_id: r.string(&f::UNIT_ID).unwrap_or_default(),
        product_id: r.string(&f::PRODUCT_ID),
        name: r.string(&f::NAME),
        machine_type: r.string(&f::TYPE),
        manufacturer: r.string(&f::MANUFACTURER),
        model: r.string(&f::MODEL),
        location: r.string(&f::LOCATION),
        health_percent: supplied_health.or_else(|| rul.map(health_from_rul)),
        synthetic_rul: rul,
        status,
        install_date: r.timestamp(&f::INSTALL_DATE),
        last_maintenance: r.timestamp(&f::LAST_MAINTENANCE),
        last_seen: r.timestamp(&f::LAST_SEEN),
        process_temperature_k: r.number(&f::PROCESS_TEMPERATURE_K),
        rotational_speed_rpm: r.number(&f::ROTATIONAL_SPEED_RPM),
        tool_wear_min: r.number(&f::TOOL_WEAR_MIN),
        is_failure: r.boolean(&f::IS_FAILURE).unwrap_or(false),
    }
}

pub fn normalize_sensor_point(raw: &Value) -> SensorPoint {
    let r = Record::new(raw);
    SensorPoint {
        timestamp: r.timestamp(&s::TIMESTAMP),
        vibration: r.number(&s::VIBRATION),
        temperature_c: r.number(&s::TEMPERATURE_C),
        current: r.number(&s::CURRENT),
        rotational_speed_rpm: r.number(&s::ROTATIONAL_SPEED_RPM),
        process_temperature_k: r.number(&s::PROCESS_TEMPERATURE_K),
        air_temperature_k: r.number(&s::AIR_TEMPERATURE_K),
        torque_nm: r.number(&s::TORQUE_NM),
        tool_wear_min: r.number(&s::TOOL_WEAR_MIN),
        synthetic_rul: r.number(&s::SYNTHETIC_RUL),
    }
}
