use serde_json::Value;

use super::fields::schedule as f;
use super::record::Record;
use super::string_list;
use crate::model::{Schedule, SchedulePriority, ScheduleStatus};

pub fn normalize_schedule(raw: &Value) -> Schedule {
    let r = Record::new(raw);
    let schedule_id = r.string(&f::SCHEDULE_ID);
    let risk_score = r.number(&f::RISK_SCORE);

    Schedule {
        id: r
            .string(&f::ID)
            .or_else(|| schedule_id.clone())
            .unwrap_or_default(),
        schedule_id,
        unit_id: r.string(&f::UNIT_ID),
        product_id: r.string(&f::PRODUCT_ID),
        risk_score,
        priority: SchedulePriority::from_risk(risk_score),
        status: r
            .string(&f::STATUS)
            .and_then(|s| ScheduleStatus::parse_lenient(&s))
            .unwrap_or_default(),
        recommended_start: r.timestamp(&f::RECOMMENDED_START),
        recommended_end: r.timestamp(&f::RECOMMENDED_END),
        reason: r.string(&f::REASON),
        actions: r.first(&f::ACTIONS, |v| Some(string_list(v))).unwrap_or_default(),
        model_version: r.string(&f::MODEL_VERSION),
        created_at: r.timestamp(&f::CREATED_AT),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn schedule_from_backend_row() {
        let s = normalize_schedule(&json!({
            "id": 31,
            "schedule_id": "SCH-0031",
            "unit_id": "M-4",
            "risk_score": 0.83,
            "status": "IN_PROGRESS",
            "recommended_start": "2024-06-01 08:00:00",
            "recommended_end": "2024-06-01T12:00:00Z",
            "actions": "[\"Replace bearing\", \"Check alignment\"]",
            "model_version": "xgb-1.2"
        }));
        assert_eq!(s.id, "31");
        assert_eq!(s.schedule_id.as_deref(), Some("SCH-0031"));
        assert_eq!(s.priority, SchedulePriority::High);
        assert_eq!(s.status, ScheduleStatus::InProgress);
        assert_eq!(s.actions, vec!["Replace bearing", "Check alignment"]);
        assert!(s.recommended_start.is_some());
    }

    #[test]
    fn schedule_id_falls_back() {
        let s = normalize_schedule(&json!({ "scheduleId": "SCH-9", "status": "archived" }));
        assert_eq!(s.id, "SCH-9");
        assert_eq!(s.status, ScheduleStatus::Unknown);
        assert_eq!(s.priority, SchedulePriority::Low);
        assert!(s.actions.is_empty());
    }

    #[test]
    fn schedule_idempotent() {
        let once = normalize_schedule(&json!({
            "id": "7",
            "risk_score": 0.55,
            "status": "pending",
            "actions": ["Lubricate"],
            "created_at": 1_709_368_200
        }));
        let again = normalize_schedule(&serde_json::to_value(&once).unwrap());
        assert_eq!(again, once);
        assert_eq!(once.priority, SchedulePriority::Medium);
    }
}
