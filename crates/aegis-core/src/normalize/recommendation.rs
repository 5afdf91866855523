use serde_json::Value;

use super::fields::recommendation as f;
use super::keys::to_camel_case;
use super::record::Record;
use super::string_list;
use crate::model::Recommendation;

pub fn normalize_recommendation(raw: &Value) -> Recommendation {
    let r = Record::new(raw);
    Recommendation {
        id: r.string(&f::ID).unwrap_or_default(),
        machine_id: r.string(&f::MACHINE_ID),
        machine_type: r.string(&f::MACHINE_TYPE),
        severity: r.string(&f::SEVERITY).map(|s| s.to_lowercase()),
        prediction: r.string(&f::PREDICTION),
        timeframe: r.string(&f::TIMEFRAME),
        confidence: r.number(&f::CONFIDENCE),
        details: r.string(&f::DETAILS),
        recommended_actions: r
            .first(&f::RECOMMENDED_ACTIONS, |v| Some(string_list(v)))
            .unwrap_or_default(),
        estimated_downtime: r.string(&f::ESTIMATED_DOWNTIME),
        recommended_start: r.timestamp(&f::RECOMMENDED_START),
        recommended_end: r.timestamp(&f::RECOMMENDED_END),
        current_metrics: r
            .object(&f::CURRENT_METRICS)
            .and_then(|m| to_camel_case(&Value::Object(m.clone())).as_object().cloned())
            .unwrap_or_default(),
        status: r.string(&f::STATUS).map(|s| s.to_lowercase()),
        created_at: r.timestamp(&f::CREATED_AT),
        ai_model: r.string(&f::AI_MODEL),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn recommendation_row() {
        let rec = normalize_recommendation(&json!({
            "id": "REC-1",
            "machine_id": "M-2",
            "severity": "HIGH",
            "confidence": "87.5",
            "recommended_actions": [{ "action": "Replace cutter" }, "Recalibrate"],
            "estimated_downtime": 4,
            "current_metrics": { "tool_wear_min": 210, "torque_nm": 51 },
            "model_version": "lstm-2"
        }));
        assert_eq!(rec.machine_id.as_deref(), Some("M-2"));
        assert_eq!(rec.severity.as_deref(), Some("high"));
        assert_eq!(rec.confidence, Some(87.5));
        assert_eq!(rec.recommended_actions, vec!["Replace cutter", "Recalibrate"]);
        assert_eq!(rec.estimated_downtime.as_deref(), Some("4"));
        assert_eq!(rec.current_metrics.get("toolWearMin"), Some(&json!(210)));
        assert_eq!(rec.ai_model.as_deref(), Some("lstm-2"));

        let again = normalize_recommendation(&serde_json::to_value(&rec).unwrap());
        assert_eq!(again, rec);
    }
}
