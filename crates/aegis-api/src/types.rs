//! Request parameters, request bodies and response envelopes.
//!
//! Entity payloads stay as `serde_json::Value`: the backend mixes
//! snake_case and camelCase freely, and `aegis-core` owns the
//! reconciliation into canonical records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Query;

// ── Query helpers ────────────────────────────────────────────────────

/// Push an optional free-text value, skipping empty strings.
fn push_opt(query: &mut Query, key: &'static str, value: Option<&String>) {
    if let Some(v) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        query.push((key, v.to_owned()));
    }
}

/// Push a categorical filter; empty and `"all"` mean no filter.
fn push_filter(query: &mut Query, key: &'static str, value: Option<&String>) {
    if let Some(v) = value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
    {
        query.push((key, v.to_owned()));
    }
}

// ── Dashboard ────────────────────────────────────────────────────────

/// `GET /dashboard/summary`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryParams {
    /// Aggregation window, e.g. `24h`.
    pub window: String,
    pub as_of: Option<String>,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            window: "24h".into(),
            as_of: None,
        }
    }
}

impl SummaryParams {
    pub fn query(&self) -> Query {
        let mut q = vec![("window", self.window.clone())];
        push_opt(&mut q, "asOf", self.as_of.as_ref());
        q
    }
}

/// `GET /dashboard/machines`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMachineParams {
    pub limit: u32,
    pub offset: u64,
    pub as_of: Option<String>,
}

impl Default for DashboardMachineParams {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            as_of: None,
        }
    }
}

impl DashboardMachineParams {
    pub fn query(&self) -> Query {
        let mut q = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        push_opt(&mut q, "asOf", self.as_of.as_ref());
        q
    }
}

/// `GET /dashboard/machine/:unitId/telemetry`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeseriesParams {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Bucket size, e.g. `1h`.
    pub interval: String,
}

impl Default for TimeseriesParams {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            interval: "1h".into(),
        }
    }
}

impl TimeseriesParams {
    pub fn query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "start", self.start.as_ref());
        push_opt(&mut q, "end", self.end.as_ref());
        q.push(("interval", self.interval.clone()));
        q
    }
}

// ── Machines ─────────────────────────────────────────────────────────

/// `GET /machines`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineListParams {
    pub limit: u32,
    pub offset: u64,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl Default for MachineListParams {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            search: None,
            status: None,
        }
    }
}

impl MachineListParams {
    pub fn query(&self) -> Query {
        let mut q = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        push_opt(&mut q, "search", self.search.as_ref());
        push_filter(&mut q, "status", self.status.as_ref());
        q
    }
}

/// `GET /machines/:unitId/sensors`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorParams {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Sampling interval, e.g. `hourly`.
    pub interval: String,
    pub limit: u32,
    pub offset: u64,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            interval: "hourly".into(),
            limit: 500,
            offset: 0,
        }
    }
}

impl SensorParams {
    pub fn query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "start", self.start.as_ref());
        push_opt(&mut q, "end", self.end.as_ref());
        q.push(("interval", self.interval.clone()));
        q.push(("limit", self.limit.to_string()));
        q.push(("offset", self.offset.to_string()));
        q
    }
}

// ── Telemetry ────────────────────────────────────────────────────────

/// `GET /telemetry`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: u32,
    pub offset: u64,
    /// `raw` or a server-side aggregation name.
    pub aggregate: String,
    pub unit_id: Option<String>,
    pub product_id: Option<String>,
}

impl Default for TelemetryParams {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: 100,
            offset: 0,
            aggregate: "raw".into(),
            unit_id: None,
            product_id: None,
        }
    }
}

impl TelemetryParams {
    pub fn query(&self) -> Query {
        let mut q = Query::new();
        push_opt(&mut q, "start", self.start.as_ref());
        push_opt(&mut q, "end", self.end.as_ref());
        q.push(("limit", self.limit.to_string()));
        q.push(("offset", self.offset.to_string()));
        q.push(("aggregate", self.aggregate.clone()));
        push_filter(&mut q, "unitId", self.unit_id.as_ref());
        push_filter(&mut q, "productId", self.product_id.as_ref());
        q
    }
}

// ── Page-numbered collections ────────────────────────────────────────

/// `GET /maintenance-schedules`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleListParams {
    /// 1-based page number.
    pub page: u64,
    pub limit: u32,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl Default for ScheduleListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: None,
            search: None,
        }
    }
}

impl ScheduleListParams {
    pub fn query(&self) -> Query {
        let mut q = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ];
        push_filter(&mut q, "status", self.status.as_ref());
        push_opt(&mut q, "search", self.search.as_ref());
        q
    }
}

/// `GET /users/data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListParams {
    /// 1-based page number.
    pub page: u64,
    pub limit: u32,
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl Default for UserListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            role: None,
            status: None,
        }
    }
}

impl UserListParams {
    pub fn query(&self) -> Query {
        let mut q = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ];
        push_opt(&mut q, "search", self.search.as_ref());
        push_filter(&mut q, "role", self.role.as_ref());
        push_filter(&mut q, "status", self.status.as_ref());
        q
    }
}

// ── Request bodies ───────────────────────────────────────────────────

/// `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// `PUT /users/:id` (partial update; absent fields are left unchanged).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// One turn sent to the copilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
}

/// `POST /copilot/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub session_id: String,
    #[serde(default)]
    pub context: Value,
}

impl ChatRequest {
    /// A single user message with an empty context object.
    pub fn user_message(content: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatTurn {
                role: "user".into(),
                content: content.into(),
            }],
            session_id: session_id.into(),
            context: Value::Object(serde_json::Map::new()),
        }
    }
}

// ── Response envelopes ───────────────────────────────────────────────

/// `{ meta, data }` envelope of offset-paged endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub meta: Value,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// `{ data, pagination }` envelope of page-numbered endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagedEnvelope {
    #[serde(default)]
    pub data: Vec<Value>,
    /// `{ total, totalPages }`; numbers sometimes arrive as strings.
    #[serde(default)]
    pub pagination: Value,
}

/// `POST /users/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Value,
    pub token: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_filter_is_dropped() {
        let params = UserListParams {
            page: 2,
            limit: 10,
            search: Some("  ".into()),
            role: Some("ALL".into()),
            status: Some("active".into()),
        };
        assert_eq!(
            params.query(),
            vec![
                ("page", "2".to_owned()),
                ("limit", "10".to_owned()),
                ("status", "active".to_owned()),
            ]
        );
    }

    #[test]
    fn page_number_is_at_least_one() {
        let params = ScheduleListParams {
            page: 0,
            ..ScheduleListParams::default()
        };
        assert_eq!(params.query()[0], ("page", "1".to_owned()));
    }

    #[test]
    fn sensor_defaults() {
        let q = SensorParams::default().query();
        assert!(q.contains(&("interval", "hourly".to_owned())));
        assert!(q.contains(&("limit", "500".to_owned())));
    }

    #[test]
    fn paged_envelope_accepts_string_totals() {
        let envelope: PagedEnvelope = serde_json::from_value(serde_json::json!({
            "data": [{ "id": 1 }],
            "pagination": { "total": "12", "totalPages": "2" }
        }))
        .unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.pagination["total"], "12");
    }

    #[test]
    fn chat_request_shape() {
        let body = serde_json::to_value(ChatRequest::user_message("hi", "user_123")).ok();
        assert_eq!(
            body,
            Some(serde_json::json!({
                "messages": [{ "role": "user", "content": "hi" }],
                "session_id": "user_123",
                "context": {}
            }))
        );
    }
}
