use serde_json::Value;

use super::fields::risk as f;
use super::record::{Field, Record, as_string, percent};
use crate::model::{RiskLevel, RiskOverview, RiskPrediction, RiskSummary};

pub fn normalize_risk_prediction(raw: &Value) -> RiskPrediction {
    let r = Record::new(raw);

    let machine_id = r.string(&f::MACHINE_ID).unwrap_or_default();
    // Absent score reads as 0 so the prediction still sorts and bands.
    let risk_score = r.number(&f::RISK_SCORE).map_or(0, percent);
    let risk_level = r
        .first(&f::RISK_LEVEL, |v| as_string(v).and_then(|s| s.parse().ok()))
        .unwrap_or_else(|| RiskLevel::from_score(risk_score));
    let failure_probability = r
        .number(&f::FAILURE_PROBABILITY)
        .map_or_else(|| percent(f64::from(risk_score) * 0.9), percent);

    RiskPrediction {
        machine_name: r
            .string(&f::MACHINE_NAME)
            .unwrap_or_else(|| format!("Machine {machine_id}")),
        machine_id,
        product_id: r.string(&f::PRODUCT_ID),
        risk_score,
        risk_level,
        primary_risk: r.string(&f::PRIMARY_RISK).unwrap_or_else(|| "Unknown".into()),
        failure_probability,
        time_to_failure: r
            .string(&f::TIME_TO_FAILURE)
            .unwrap_or_else(|| "Unknown".into()),
        trend: r.string(&f::TREND).unwrap_or_else(|| "stable".into()),
        schedule_id: r.string(&f::SCHEDULE_ID),
        recommended_start: r.timestamp(&f::RECOMMENDED_START),
        recommended_end: r.timestamp(&f::RECOMMENDED_END),
        status: r.string(&f::STATUS).unwrap_or_else(|| "pending".into()),
    }
}

/// `{ predictions, summary }`. A missing summary is recounted from the
/// predictions' bands.
pub fn normalize_risk_overview(raw: &Value) -> RiskOverview {
    let r = Record::new(raw);
    let predictions: Vec<RiskPrediction> = match raw {
        Value::Array(rows) => rows.iter().map(normalize_risk_prediction).collect(),
        _ => r
            .array(&f::PREDICTIONS)
            .map(|rows| rows.iter().map(normalize_risk_prediction).collect())
            .unwrap_or_default(),
    };

    let summary = match r.first(&f::SUMMARY, |v| v.is_object().then_some(v)) {
        Some(block) => {
            let block = Record::new(block);
            let count = |field: &Field| block.count(field).unwrap_or(0);
            RiskSummary {
                critical: count(&f::CRITICAL),
                high: count(&f::HIGH),
                medium: count(&f::MEDIUM),
                low: count(&f::LOW),
            }
        }
        None => summarize(&predictions),
    };

    RiskOverview {
        predictions,
        summary,
    }
}

fn summarize(predictions: &[RiskPrediction]) -> RiskSummary {
    predictions
        .iter()
        .fold(RiskSummary::default(), |mut acc, p| {
            match p.risk_level {
                RiskLevel::Critical => acc.critical += 1,
                RiskLevel::High => acc.high += 1,
                RiskLevel::Medium => acc.medium += 1,
                RiskLevel::Low => acc.low += 1,
            }
            acc
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_for_sparse_row() {
        let p = normalize_risk_prediction(&json!({ "unit_id": "M-3", "risk_score": 62.4 }));
        assert_eq!(p.machine_id, "M-3");
        assert_eq!(p.machine_name, "Machine M-3");
        assert_eq!(p.risk_score, 62);
        assert_eq!(p.risk_level, RiskLevel::High);
        assert_eq!(p.failure_probability, 56);
        assert_eq!(p.primary_risk, "Unknown");
        assert_eq!(p.time_to_failure, "Unknown");
        assert_eq!(p.trend, "stable");
        assert_eq!(p.status, "pending");
    }

    #[test]
    fn absent_score_is_zero_and_low() {
        let p = normalize_risk_prediction(&json!({ "machineId": "M-9" }));
        assert_eq!(p.risk_score, 0);
        assert_eq!(p.risk_level, RiskLevel::Low);
        assert_eq!(p.failure_probability, 0);
    }

    #[test]
    fn supplied_level_and_reason_alias() {
        let p = normalize_risk_prediction(&json!({
            "machineId": "M-1",
            "riskScore": 20,
            "riskLevel": "CRITICAL",
            "reason": "Tool wear"
        }));
        assert_eq!(p.risk_level, RiskLevel::Critical);
        assert_eq!(p.primary_risk, "Tool wear");
    }

    #[test]
    fn prediction_idempotent() {
        let once = normalize_risk_prediction(&json!({
            "machine_id": "M-2",
            "risk_score": 88,
            "recommended_start": "2024-06-01T08:00:00Z",
            "schedule_id": 14
        }));
        let again = normalize_risk_prediction(&serde_json::to_value(&once).unwrap());
        assert_eq!(again, once);
    }

    #[test]
    fn overview_with_summary() {
        let o = normalize_risk_overview(&json!({
            "predictions": [{ "machineId": "A", "riskScore": 90 }],
            "summary": { "critical": 1, "high": 0, "medium": 3, "low": 7 }
        }));
        assert_eq!(o.predictions.len(), 1);
        assert_eq!(o.summary.medium, 3);
        assert_eq!(o.summary.total(), 11);
    }

    #[test]
    fn overview_recounts_missing_summary() {
        let o = normalize_risk_overview(&json!([
            { "machineId": "A", "riskScore": 90 },
            { "machineId": "B", "riskScore": 55 },
            { "machineId": "C", "riskScore": 10 }
        ]));
        assert_eq!(
            o.summary,
            RiskSummary {
                critical: 1,
                high: 1,
                medium: 0,
                low: 1
            }
        );
    }

    #[test]
    fn overview_idempotent() {
        let once = normalize_risk_overview(&json!({
            "predictions": [{ "unit_id": "A", "risk_score": 40 }],
            "summary": { "medium": 1 }
        }));
        let again = normalize_risk_overview(&serde_json::to_value(&once).unwrap());
        assert_eq!(again, once);
    }
}
