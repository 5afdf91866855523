// ── Generic key transformer ──
//
// snake_case → camelCase for payloads without a dedicated normalizer.
// Only an underscore followed by a lowercase ASCII letter is folded, so
// `synthetic_RUL` stays as-is and camelCase input passes through.

use serde_json::{Map, Value};

/// `avg_health` → `avgHealth`.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Recursively camelCase every object key.
pub fn to_camel_case(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(to_camel_case).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (snake_to_camel(k), to_camel_case(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}
