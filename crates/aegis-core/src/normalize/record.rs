// ── Alias-table field resolution ──
//
// A canonical field is a name plus an ordered list of candidate keys.
// Resolution walks the candidates and takes the first one that is present,
// non-null and readable as the requested type. Candidates may be dotted
// paths (`meta.lastSeen`) into nested objects.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// One canonical field and its candidate source keys, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl Field {
    pub const fn new(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self { name, keys }
    }
}

/// Read-only view over one loosely typed server record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    raw: &'a Value,
}

impl<'a> Record<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// Value at `key` (dotted path allowed); JSON `null` counts as absent.
    pub fn lookup(&self, key: &str) -> Option<&'a Value> {
        let mut current = self.raw;
        for part in key.split('.') {
            current = current.as_object()?.get(part)?;
        }
        (!current.is_null()).then_some(current)
    }

    /// First candidate of `field` for which `read` yields a value.
    pub fn first<T>(&self, field: &Field, read: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        field
            .keys
            .iter()
            .filter_map(|key| self.lookup(key))
            .find_map(read)
    }

    /// Whether any candidate of `field` is present at all.
    pub fn has(&self, field: &Field) -> bool {
        field.keys.iter().any(|key| self.lookup(key).is_some())
    }

    pub fn string(&self, field: &Field) -> Option<String> {
        self.first(field, as_string)
    }

    pub fn number(&self, field: &Field) -> Option<f64> {
        self.first(field, as_number)
    }

    pub fn integer(&self, field: &Field) -> Option<i64> {
        self.first(field, as_number)
            .filter(|n| n.fract() == 0.0)
            .and_then(f64_to_i64)
    }

    /// Non-negative count; fractional values are rounded.
    pub fn count(&self, field: &Field) -> Option<u64> {
        self.number(field).and_then(round_to_u64)
    }

    pub fn boolean(&self, field: &Field) -> Option<bool> {
        self.first(field, as_bool)
    }

    pub fn timestamp(&self, field: &Field) -> Option<DateTime<Utc>> {
        self.first(field, as_timestamp)
    }

    pub fn object(&self, field: &Field) -> Option<&'a Map<String, Value>> {
        self.first(field, Value::as_object)
    }

    pub fn array(&self, field: &Field) -> Option<&'a Vec<Value>> {
        self.first(field, Value::as_array)
    }
}

// ── Scalar readers ───────────────────────────────────────────────────

/// Non-empty trimmed string; numbers are accepted as identifiers.
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number, from a JSON number or a numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// RFC 3339, naive date-time (read as UTC), bare date, or epoch
/// seconds/milliseconds.
pub fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            if raw.abs() >= 100_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }
        _ => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ── Numeric conversion ───────────────────────────────────────────────

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn f64_to_i64(n: f64) -> Option<i64> {
    // i64::MAX is not representable; stay strictly inside the range.
    (-9.2e18..=9.2e18).contains(&n).then(|| n as i64)
}

pub(crate) fn round_to_i64(n: f64) -> Option<i64> {
    f64_to_i64(n.round())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub(crate) fn round_to_u64(n: f64) -> Option<u64> {
    let rounded = n.round();
    (0.0..=1.8e19).contains(&rounded).then(|| rounded as u64)
}

/// Round and clamp into `0..=100`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub(crate) fn percent(n: f64) -> u8 {
    n.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RUL: Field = Field::new(
        "syntheticRUL",
        &["syntheticRUL", "synthetic_RUL", "synthetic_rul"],
    );
    const LAST_SEEN: Field = Field::new("lastSeen", &["meta.lastSeen", "lastSeen", "last_seen"]);

    #[test]
    fn first_present_wins() {
        let raw = json!({ "synthetic_RUL": 40, "synthetic_rul": 99 });
        assert_eq!(Record::new(&raw).number(&RUL), Some(40.0));
    }

    #[test]
    fn null_counts_as_absent() {
        let raw = json!({ "syntheticRUL": null, "synthetic_rul": "12.5" });
        assert_eq!(Record::new(&raw).number(&RUL), Some(12.5));
    }

    #[test]
    fn unreadable_candidate_falls_through() {
        let raw = json!({ "syntheticRUL": "n/a", "synthetic_rul": 7 });
        assert_eq!(Record::new(&raw).number(&RUL), Some(7.0));
    }

    #[test]
    fn absent_numeric_is_none_not_zero() {
        let raw = json!({ "name": "Press 4" });
        assert_eq!(Record::new(&raw).number(&RUL), None);
        assert!(!Record::new(&raw).has(&RUL));
    }

    #[test]
    fn dotted_path_reaches_nested_object() {
        let raw = json!({ "meta": { "lastSeen": "2024-05-01T10:00:00Z" }, "lastSeen": "1999-01-01" });
        let ts = Record::new(&raw).timestamp(&LAST_SEEN).map(|t| t.to_rfc3339());
        assert_eq!(ts.as_deref(), Some("2024-05-01T10:00:00+00:00"));
    }

    #[test]
    fn timestamp_formats() {
        let expected = parse_timestamp("2024-03-02T08:30:00Z");
        assert!(expected.is_some());
        assert_eq!(parse_timestamp("2024-03-02 08:30:00"), expected);
        assert_eq!(parse_timestamp("2024-03-02T08:30:00"), expected);
        assert_eq!(as_timestamp(&json!(1_709_368_200)), expected);
        assert_eq!(as_timestamp(&json!(1_709_368_200_000_i64)), expected);
        assert_eq!(
            parse_timestamp("2024-03-02").map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-03-02T00:00:00+00:00")
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn booleans_and_strings() {
        assert_eq!(as_bool(&json!(1)), Some(true));
        assert_eq!(as_bool(&json!("False")), Some(false));
        assert_eq!(as_bool(&json!(2)), None);
        assert_eq!(as_string(&json!(42)), Some("42".to_owned()));
        assert_eq!(as_string(&json!("   ")), None);
    }

    #[test]
    fn percent_clamps() {
        assert_eq!(percent(100.6), 100);
        assert_eq!(percent(-3.0), 0);
        assert_eq!(percent(49.5), 50);
    }
}
