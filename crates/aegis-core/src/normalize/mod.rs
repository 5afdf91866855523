// ── Field normalization ──
//
// Every server payload passes through here before reaching the domain
// model. Normalizers are total (any JSON value yields a record), keep
// absent numerics as `None`, and are idempotent: feeding serialized output
// back in produces the same record.

pub mod fields;
pub mod keys;
pub mod record;

mod dashboard;
mod machine;
mod recommendation;
mod risk;
mod schedule;
mod telemetry;
mod user;

pub use dashboard::{
    normalize_active_tasks, normalize_summary, normalize_team_members, normalize_team_performance,
    normalize_team_week,
};
pub use keys::{snake_to_camel, to_camel_case};
pub use machine::{derive_status, normalize_machine, normalize_sensor_point};
pub use recommendation::normalize_recommendation;
pub use record::{Field, Record};
pub use risk::{normalize_risk_overview, normalize_risk_prediction};
pub use schedule::normalize_schedule;
pub use telemetry::{normalize_telemetry_row, normalize_timeseries, normalize_timeseries_row};
pub use user::normalize_user;

use serde_json::Value;

const ACTION_KEYS: [&str; 5] = ["action", "description", "name", "title", "step"];

/// Rows of a list payload: a bare array, or the array under `data`.
/// Anything else is an empty list.
pub fn rows(raw: &Value) -> &[Value] {
    match raw {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// Normalize every row of a list payload.
pub fn normalize_rows<T>(raw: &Value, normalize: impl Fn(&Value) -> T) -> Vec<T> {
    rows(raw).iter().map(normalize).collect()
}

/// Action lists arrive as arrays of strings or objects, a JSON-encoded
/// array inside a string, newline separated text, or a single string.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(list_item).collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[') {
                if let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
                    return string_list(&parsed);
                }
            }
            trimmed
                .lines()
                .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect()
        }
        _ => Vec::new(),
    }
}

fn list_item(item: &Value) -> Option<String> {
    match item {
        Value::Object(map) => ACTION_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(record::as_string),
        other => record::as_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rows_accepts_array_or_envelope() {
        assert_eq!(rows(&json!([1, 2])).len(), 2);
        assert_eq!(rows(&json!({ "data": [1] })).len(), 1);
        assert!(rows(&json!({ "data": "nope" })).is_empty());
        assert!(rows(&json!(null)).is_empty());
    }

    #[test]
    fn string_list_shapes() {
        assert_eq!(string_list(&json!(["a", " b ", ""])), vec!["a", "b"]);
        assert_eq!(string_list(&json!("[\"x\",\"y\"]")), vec!["x", "y"]);
        assert_eq!(string_list(&json!("- one\n- two\n")), vec!["one", "two"]);
        assert_eq!(string_list(&json!("single")), vec!["single"]);
        assert_eq!(
            string_list(&json!([{ "description": "Inspect" }, { "other": 1 }])),
            vec!["Inspect"]
        );
        assert!(string_list(&json!(5)).is_empty());
    }

    #[test]
    fn string_list_is_idempotent() {
        let once = string_list(&json!("[\"Replace bearing\", \"Check alignment\"]"));
        assert_eq!(string_list(&json!(once)), once);
    }
}
