// ── Alias tables ──
//
// Ordered candidate keys per canonical field: camelCase first, then the
// snake_case spellings the backend emits, then legacy aliases. Every table
// lists its canonical (serialized) key so normalized output re-normalizes
// to itself.

use super::record::Field;

// ── Sensor channels (shared by machines, sensors, telemetry) ─────────

pub const PRODUCT_ID: Field = Field::new("productId", &["productId", "product_id"]);
pub const UNIT_ID: Field = Field::new("unitId", &["unitId", "unit_id"]);
pub const TIMESTAMP: Field = Field::new("timestamp", &["timestamp", "ts", "time"]);
pub const SYNTHETIC_RUL: Field = Field::new(
    "syntheticRUL",
    &["syntheticRUL", "synthetic_RUL", "synthetic_rul"],
);
pub const PROCESS_TEMPERATURE_K: Field = Field::new(
    "processTemperatureK",
    &[
        "processTemperatureK",
        "process_temperature_K",
        "process_temperature_k",
    ],
);
pub const AIR_TEMPERATURE_K: Field = Field::new(
    "airTemperatureK",
    &["airTemperatureK", "air_temperature_K", "air_temperature_k"],
);
pub const ROTATIONAL_SPEED_RPM: Field = Field::new(
    "rotationalSpeedRpm",
    &["rotationalSpeedRpm", "rotational_speed_rpm"],
);
pub const TORQUE_NM: Field = Field::new("torqueNm", &["torqueNm", "torque_nm", "torque_Nm"]);
pub const TOOL_WEAR_MIN: Field = Field::new("toolWearMin", &["toolWearMin", "tool_wear_min"]);
pub const IS_FAILURE: Field = Field::new("isFailure", &["isFailure", "is_failure"]);

pub mod machine {
    use super::Field;

    pub use super::{
        IS_FAILURE, PROCESS_TEMPERATURE_K, PRODUCT_ID, ROTATIONAL_SPEED_RPM, SYNTHETIC_RUL,
        TOOL_WEAR_MIN,
    };

    pub const UNIT_ID: Field = Field::new("unitId", &["unitId", "unit_id", "id"]);
    pub const NAME: Field = Field::new("name", &["name", "machineName", "machine_name"]);
    pub const TYPE: Field = Field::new("type", &["type", "machineType", "machine_type"]);
    pub const MANUFACTURER: Field = Field::new("manufacturer", &["manufacturer"]);
    pub const MODEL: Field = Field::new("model", &["model"]);
    pub const LOCATION: Field = Field::new("location", &["location"]);
    pub const HEALTH_PERCENT: Field =
        Field::new("healthPercent", &["healthPercent", "health_percent"]);
    pub const STATUS: Field = Field::new("status", &["status"]);
    pub const INSTALL_DATE: Field = Field::new("installDate", &["installDate", "install_date"]);
    pub const LAST_MAINTENANCE: Field =
        Field::new("lastMaintenance", &["lastMaintenance", "last_maintenance"]);
    pub const LAST_SEEN: Field =
        Field::new("lastSeen", &["lastSeen", "last_seen", "meta.lastSeen"]);
}

pub mod sensor {
    use super::Field;

    pub use super::{
        AIR_TEMPERATURE_K, PROCESS_TEMPERATURE_K, ROTATIONAL_SPEED_RPM, SYNTHETIC_RUL, TIMESTAMP,
        TOOL_WEAR_MIN, TORQUE_NM,
    };

    /// Falls back to the rotational speed channel.
    pub const VIBRATION: Field = Field::new(
        "vibration",
        &["vibration", "rotationalSpeedRpm", "rotational_speed_rpm"],
    );
    pub const TEMPERATURE_C: Field =
        Field::new("temperatureC", &["temperatureC", "temperature_c", "temperature_C"]);
    /// Falls back to the torque channel.
    pub const CURRENT: Field =
        Field::new("current", &["current", "torqueNm", "torque_nm", "torque_Nm"]);
}

pub mod telemetry {
    use super::Field;

    pub use super::{
        AIR_TEMPERATURE_K, IS_FAILURE, PROCESS_TEMPERATURE_K, PRODUCT_ID, ROTATIONAL_SPEED_RPM,
        SYNTHETIC_RUL, TIMESTAMP, TOOL_WEAR_MIN, TORQUE_NM, UNIT_ID,
    };

    pub const STEP_INDEX: Field = Field::new("stepIndex", &["stepIndex", "step_index"]);
    pub const FAILURE_TYPE: Field = Field::new("failureType", &["failureType", "failure_type"]);
    pub const AVG_PROCESS_TEMPERATURE_K: Field = Field::new(
        "avgProcessTemperatureK",
        &[
            "avgProcessTemperatureK",
            "avg_process_temperature_K",
            "avg_process_temperature_k",
        ],
    );
    pub const AVG_ROTATIONAL_SPEED_RPM: Field = Field::new(
        "avgRotationalSpeedRpm",
        &["avgRotationalSpeedRpm", "avg_rotational_speed_rpm"],
    );
    pub const AVG_TORQUE_NM: Field = Field::new(
        "avgTorqueNm",
        &["avgTorqueNm", "avg_torque_Nm", "avg_torque_nm"],
    );
    pub const AVG_TOOL_WEAR_MIN: Field =
        Field::new("avgToolWearMin", &["avgToolWearMin", "avg_tool_wear_min"]);
    pub const AVG_SYNTHETIC_RUL: Field = Field::new(
        "avgSyntheticRUL",
        &["avgSyntheticRUL", "avg_synthetic_RUL", "avg_synthetic_rul"],
    );
}

pub mod risk {
    use super::Field;

    pub const MACHINE_ID: Field = Field::new(
        "machineId",
        &["machineId", "machine_id", "unitId", "unit_id"],
    );
    pub const MACHINE_NAME: Field = Field::new("machineName", &["machineName", "machine_name"]);
    pub use super::PRODUCT_ID;
    pub const RISK_SCORE: Field = Field::new("riskScore", &["riskScore", "risk_score"]);
    pub const RISK_LEVEL: Field = Field::new("riskLevel", &["riskLevel", "risk_level"]);
    pub const PRIMARY_RISK: Field =
        Field::new("primaryRisk", &["primaryRisk", "primary_risk", "reason"]);
    pub const FAILURE_PROBABILITY: Field = Field::new(
        "failureProbability",
        &["failureProbability", "failure_probability"],
    );
    pub const TIME_TO_FAILURE: Field =
        Field::new("timeToFailure", &["timeToFailure", "time_to_failure"]);
    pub const TREND: Field = Field::new("trend", &["trend"]);
    pub const SCHEDULE_ID: Field = Field::new("scheduleId", &["scheduleId", "schedule_id"]);
    pub const RECOMMENDED_START: Field =
        Field::new("recommendedStart", &["recommendedStart", "recommended_start"]);
    pub const RECOMMENDED_END: Field =
        Field::new("recommendedEnd", &["recommendedEnd", "recommended_end"]);
    pub const STATUS: Field = Field::new("status", &["status"]);

    pub const PREDICTIONS: Field = Field::new("predictions", &["predictions", "data"]);
    pub const SUMMARY: Field = Field::new("summary", &["summary"]);
    pub const CRITICAL: Field = Field::new("critical", &["critical"]);
    pub const HIGH: Field = Field::new("high", &["high"]);
    pub const MEDIUM: Field = Field::new("medium", &["medium"]);
    pub const LOW: Field = Field::new("low", &["low"]);
}

pub mod dashboard {
    use super::Field;

    pub const TOTAL_MACHINES: Field = Field::new("totalMachines", &["totalMachines"]);
    pub const STATS: Field = Field::new("stats", &["stats"]);
    pub const AVG_HEALTH: Field = Field::new("avgHealth", &["avgHealth"]);
    pub const STATUS_COUNTS: Field = Field::new("statusCounts", &["statusCounts"]);
    pub const HEALTHY: Field = Field::new("healthy", &["healthy"]);
    pub const WARNING: Field = Field::new("warning", &["warning"]);
    pub const CRITICAL: Field = Field::new("critical", &["critical"]);
    pub const ACTIVE_FAILURES: Field = Field::new("activeFailures", &["activeFailures"]);

    pub const IN_PROGRESS: Field = Field::new("inProgress", &["inProgress", "in_progress"]);
    pub const PENDING: Field = Field::new("pending", &["pending"]);
    pub const COMPLETED: Field = Field::new("completed", &["completed"]);
    pub const CANCELLED: Field = Field::new("cancelled", &["cancelled", "canceled"]);

    pub const TOTAL: Field = Field::new("total", &["total"]);
    pub const AVAILABLE: Field = Field::new("available", &["available"]);
    pub const ON_TASK: Field = Field::new("onTask", &["onTask", "on_task"]);

    pub const WEEK_NAME: Field = Field::new("name", &["week", "name"]);
    pub const WEEK_START: Field = Field::new("weekStart", &["weekStart", "week_start"]);
    pub const TASKS_COMPLETED: Field = Field::new(
        "completed",
        &["tasksCompleted", "tasks_completed", "completed"],
    );
    pub const TOTAL_SCHEDULED: Field =
        Field::new("totalScheduled", &["totalScheduled", "total_scheduled"]);
    pub const EFFICIENCY: Field = Field::new("efficiency", &["efficiency"]);
}

pub mod schedule {
    use super::Field;

    pub use super::{PRODUCT_ID, UNIT_ID};
    pub use super::risk::{RECOMMENDED_END, RECOMMENDED_START, RISK_SCORE, SCHEDULE_ID, STATUS};

    pub const ID: Field = Field::new("id", &["id"]);
    pub const REASON: Field = Field::new("reason", &["reason"]);
    pub const ACTIONS: Field = Field::new("actions", &["actions", "recommended_actions"]);
    pub const MODEL_VERSION: Field = Field::new("modelVersion", &["modelVersion", "model_version"]);
    pub const CREATED_AT: Field = Field::new("createdAt", &["createdAt", "created_at"]);
}

pub mod user {
    use super::Field;

    pub use super::schedule::{CREATED_AT, ID};

    pub const NAME: Field = Field::new("name", &["name", "full_name", "fullName"]);
    pub const EMAIL: Field = Field::new("email", &["email"]);
    pub const PHONE: Field = Field::new("phone", &["phone", "phone_number", "phoneNumber"]);
    pub const ROLE: Field = Field::new("role", &["role"]);
    pub const SPECIALIZATION: Field = Field::new("specialization", &["specialization"]);
    pub const STATUS: Field = Field::new("status", &["status"]);
}

pub mod recommendation {
    use super::Field;

    pub use super::risk::{MACHINE_ID, RECOMMENDED_END, RECOMMENDED_START, STATUS};
    pub use super::schedule::{CREATED_AT, ID};

    pub const MACHINE_TYPE: Field = Field::new("machineType", &["machineType", "machine_type"]);
    pub const SEVERITY: Field = Field::new("severity", &["severity"]);
    pub const PREDICTION: Field = Field::new("prediction", &["prediction"]);
    pub const TIMEFRAME: Field = Field::new("timeframe", &["timeframe", "time_frame"]);
    pub const CONFIDENCE: Field = Field::new("confidence", &["confidence"]);
    pub const DETAILS: Field = Field::new("details", &["details", "description"]);
    pub const RECOMMENDED_ACTIONS: Field = Field::new(
        "recommendedActions",
        &["recommendedActions", "recommended_actions", "actions"],
    );
    pub const ESTIMATED_DOWNTIME: Field = Field::new(
        "estimatedDowntime",
        &["estimatedDowntime", "estimated_downtime"],
    );
    pub const CURRENT_METRICS: Field =
        Field::new("currentMetrics", &["currentMetrics", "current_metrics"]);
    pub const AI_MODEL: Field = Field::new("aiModel", &["aiModel", "ai_model", "model_version"]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Vec<Field> {
        vec![
            PRODUCT_ID,
            UNIT_ID,
            TIMESTAMP,
            SYNTHETIC_RUL,
            PROCESS_TEMPERATURE_K,
            AIR_TEMPERATURE_K,
            ROTATIONAL_SPEED_RPM,
            TORQUE_NM,
            TOOL_WEAR_MIN,
            IS_FAILURE,
            machine::UNIT_ID,
            machine::NAME,
            machine::TYPE,
            machine::HEALTH_PERCENT,
            machine::STATUS,
            machine::INSTALL_DATE,
            machine::LAST_MAINTENANCE,
            machine::LAST_SEEN,
            sensor::VIBRATION,
            sensor::TEMPERATURE_C,
            sensor::CURRENT,
            telemetry::STEP_INDEX,
            telemetry::FAILURE_TYPE,
            telemetry::AVG_PROCESS_TEMPERATURE_K,
            telemetry::AVG_ROTATIONAL_SPEED_RPM,
            telemetry::AVG_TORQUE_NM,
            telemetry::AVG_TOOL_WEAR_MIN,
            telemetry::AVG_SYNTHETIC_RUL,
            risk::MACHINE_ID,
            risk::MACHINE_NAME,
            risk::RISK_SCORE,
            risk::RISK_LEVEL,
            risk::PRIMARY_RISK,
            risk::FAILURE_PROBABILITY,
            risk::TIME_TO_FAILURE,
            risk::SCHEDULE_ID,
            risk::RECOMMENDED_START,
            risk::RECOMMENDED_END,
            dashboard::IN_PROGRESS,
            dashboard::ON_TASK,
            dashboard::WEEK_NAME,
            dashboard::WEEK_START,
            dashboard::TASKS_COMPLETED,
            dashboard::TOTAL_SCHEDULED,
            schedule::ACTIONS,
            schedule::MODEL_VERSION,
            schedule::CREATED_AT,
            user::NAME,
            user::PHONE,
            recommendation::MACHINE_TYPE,
            recommendation::RECOMMENDED_ACTIONS,
            recommendation::ESTIMATED_DOWNTIME,
            recommendation::CURRENT_METRICS,
            recommendation::AI_MODEL,
        ]
    }

    #[test]
    fn every_table_accepts_its_canonical_key() {
        for field in tables() {
            assert!(
                field.keys.contains(&field.name),
                "{} missing from its own candidates",
                field.name
            );
        }
    }

    #[test]
    fn candidates_are_unique_per_field() {
        for field in tables() {
            let mut keys = field.keys.to_vec();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), field.keys.len(), "duplicate key in {}", field.name);
        }
    }

    #[test]
    fn camel_case_is_preferred_over_snake_case() {
        for field in tables() {
            let camel = field.keys.iter().position(|k| *k == field.name);
            let snake = field.keys.iter().position(|k| k.contains('_'));
            if let (Some(camel), Some(snake)) = (camel, snake) {
                if field.name != "name" {
                    assert!(camel < snake, "{} prefers snake_case", field.name);
                }
            }
        }
    }
}
