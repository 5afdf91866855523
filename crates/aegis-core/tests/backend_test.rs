// End-to-end behaviour of `Backend` and its syncs against a mock API.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aegis_api::types::{NewUser, SummaryParams, UserUpdate};
use aegis_api::{MemorySession, Session};
use aegis_core::{Backend, ChatSender, ClientConfig, CoreError, Filter, MachineStatus, SyncStatus};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Backend, Arc<MemorySession>) {
    setup_with(|_| {}).await
}

async fn setup_with(tweak: impl FnOnce(&mut ClientConfig)) -> (MockServer, Backend, Arc<MemorySession>) {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySession::new());
    let mut config = ClientConfig::new(Url::parse(&format!("{}/api", server.uri())).unwrap());
    tweak(&mut config);
    let backend = Backend::new(config, session.clone()).unwrap();
    (server, backend, session)
}

fn machine_rows(offset: u64, count: u64) -> Vec<Value> {
    (offset..offset + count)
        .map(|i| {
            json!({
                "unit_id": format!("M-{i:03}"),
                "product_id": format!("L{i}"),
                "synthetic_RUL": 150,
            })
        })
        .collect()
}

fn machines_body(offset: u64, count: u64, total: u64) -> Value {
    json!({
        "meta": { "count": total, "limit": 50, "offset": offset },
        "data": machine_rows(offset, count),
    })
}

fn users_body(names: &[&str]) -> Value {
    let data: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "full_name": name, "role": "Technician" }))
        .collect();
    json!({ "data": data, "pagination": { "total": names.len(), "totalPages": 1 } })
}

// ── Machines ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_machine_list_pages_through_237_rows() {
    let (server, backend, _) = setup_with(|c| c.page_size = 50).await;

    Mock::given(method("GET"))
        .and(path("/api/machines"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(machines_body(0, 50, 237)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/machines"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(machines_body(100, 50, 237)))
        .expect(1)
        .mount(&server)
        .await;

    let list = backend.machine_list();
    list.start().await;
    let first = list.state();
    assert_eq!(first.status, SyncStatus::Ready);
    assert_eq!(first.items.len(), 50);
    assert_eq!(first.total_pages(), 5);
    assert!(first.has_next());
    assert!(!first.has_prev());

    assert!(list.go_to_page(2).await);
    let third = list.state();
    assert_eq!(third.cursor.offset, 100);
    assert_eq!(third.cursor.page_number(), 3);
    assert_eq!(third.items[0].unit_id, "M-100");
    assert_eq!(third.items[0].health_percent, Some(75));
    assert_eq!(third.items[0].status, MachineStatus::Healthy);
    assert!(third.has_next());
    assert!(third.has_prev());
}

#[tokio::test]
async fn test_server_error_keeps_machine_list() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(machines_body(0, 3, 3)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/machines"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let list = backend.machine_list();
    list.start().await;
    assert_eq!(list.state().items.len(), 3);

    list.refetch().await;
    let state = list.state();
    assert_eq!(state.items.len(), 3);
    let error = state.error().unwrap();
    assert_eq!(error.status, Some(500));
    assert_eq!(error.message, "Internal Server Error");
}

#[tokio::test]
async fn test_machine_detail_unwraps_data() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines/M-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "unitId": "M-7", "healthPercent": 42, "status": "warning" }
        })))
        .mount(&server)
        .await;

    let machine = backend.machine("M-7").await.unwrap();
    assert_eq!(machine.unit_id, "M-7");
    assert_eq!(machine.health_percent, Some(42));
    assert_eq!(machine.status, MachineStatus::Warning);
}

#[tokio::test]
async fn test_missing_machine_is_not_found() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Machine not found" })),
        )
        .mount(&server)
        .await;

    let err = backend.machine("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.info().message, "Machine not found");
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_is_normalized() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/summary"))
        .and(query_param("window", "24h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_machines": 120,
            "stats": { "avg_health": 81.5 },
            "status_counts": { "healthy": 90, "warning": 20, "critical": 10 },
            "active_failures": 4,
            "generated_at": "2026-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let summary = backend.summary(&SummaryParams::default()).await.unwrap();
    assert_eq!(summary.total_machines, 120);
    assert_eq!(summary.stats.avg_health, Some(81.5));
    assert_eq!(summary.status_counts.critical, 10);
    assert_eq!(summary.active_failures, 4);
    assert!(summary.extra.contains_key("generatedAt"));
}

#[tokio::test]
async fn test_active_tasks_total_is_recomputed() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/active-tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "in_progress": 3, "pending": 5, "completed": 10, "canceled": 1, "total": 999
        })))
        .mount(&server)
        .await;

    let sync = backend.active_tasks_sync();
    sync.start(std::time::Duration::ZERO).await;
    let tasks = sync.value().unwrap();
    assert_eq!(tasks.cancelled, 1);
    assert_eq!(tasks.total, 19);
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_create_refetches_list() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body(&["Ana"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body(&["Ana", "Bo"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 2 })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = backend.user_directory();
    directory.list().start().await;
    assert_eq!(directory.list().state().items.len(), 1);

    let outcome = directory
        .create(&NewUser {
            name: "Bo".into(),
            email: "bo@plant.io".into(),
            role: "technician".into(),
            password: "Lathe2024".into(),
            phone: None,
            specialization: None,
        })
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.error, None);

    let state = directory.list().state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].name.as_deref(), Some("Bo"));
    assert_eq!(state.items[1].role.as_deref(), Some("technician"));
}

#[tokio::test]
async fn test_rejected_update_reports_outcome() {
    let (server, backend, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/5"))
        .and(body_json(json!({ "email": "taken@plant.io" })))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Email already in use" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let directory = backend.user_directory();
    let update = UserUpdate {
        email: Some("taken@plant.io".into()),
        ..UserUpdate::default()
    };
    let outcome = directory.update("5", &update).await;
    assert!(!outcome.success);
    let error = outcome.error.unwrap();
    assert_eq!(error.status, Some(422));
    assert_eq!(error.message, "Email already in use");

    let empty = directory.update("5", &UserUpdate::default()).await;
    assert!(!empty.success);
    assert_eq!(empty.error.unwrap().status, None);
}

#[tokio::test]
async fn test_user_filters_reach_the_query() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .and(query_param("role", "supervisor"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body(&["Cy"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_body(&["Ana", "Bo"])))
        .mount(&server)
        .await;

    let directory = backend.user_directory();
    directory.list().start().await;
    directory
        .list()
        .set_filter(Filter::Role, Some("supervisor"))
        .await;
    assert_eq!(directory.list().state().items.len(), 1);
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_and_logout() {
    let (server, backend, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 7, "fullName": "Ops Lead", "role": "Admin" },
            "token": "tok-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let user = backend
        .login("ops@plant.io", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.name.as_deref(), Some("Ops Lead"));
    assert_eq!(user.role.as_deref(), Some("admin"));
    assert!(backend.is_authenticated());

    backend.logout().await.unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_change_password_validates_before_sending() {
    let (server, backend, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/change-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let secret = |s: &str| SecretString::from(s.to_owned());
    let err = backend
        .change_password(&secret("Turbine42"), &secret("Lathe2024"), &secret("Lathe2025"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    backend
        .change_password(&secret("Turbine42"), &secret("Lathe2024"), &secret("Lathe2024"))
        .await
        .unwrap();
}

// ── Copilot ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_conversation_round_trip() {
    let (server, backend, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/copilot/chat"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "Which machines need service?" }],
            "session_id": "user_123",
            "context": {}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "reply": "M-004 and M-017." })),
        )
        .mount(&server)
        .await;

    let mut chat = backend.conversation(aegis_core::copilot::DEFAULT_SESSION_ID);
    assert_eq!(chat.messages().len(), 1);

    let reply = chat.send("Which machines need service?").await.unwrap();
    assert_eq!(reply.sender, ChatSender::Ai);
    assert_eq!(reply.message, "M-004 and M-017.");
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.session().title, "Which machines need service?");

    let archived = chat.new_chat();
    assert_eq!(archived.messages.len(), 3);
    assert_eq!(chat.messages().len(), 1);
}

// ── Machine detail views ────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_machines_page() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/machines"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(machines_body(0, 2, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let page = backend
        .dashboard_machines(&aegis_api::types::DashboardMachineParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[1].unit_id, "M-001");
}

#[tokio::test]
async fn test_machine_detail_syncs() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines/M-007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "unit_id": "M-007", "health_percent": 42 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/machines/M-007/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "count": 1 },
            "data": [{ "timestamp": "2024-05-01T10:00:00Z", "torque_nm": 41.5 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/machine/M-007/telemetry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "timestamp": "2024-05-01T10:00:00Z", "avg_torque_nm": 40.0 },
            { "timestamp": "2024-05-01T11:00:00Z", "avg_torque_nm": 43.0 }
        ])))
        .mount(&server)
        .await;

    let machine = backend.machine_sync("M-007");
    let sensors = backend.sensors_sync("M-007", aegis_api::types::SensorParams::default());
    let series = backend.timeseries_sync("M-007", aegis_api::types::TimeseriesParams::default());
    machine.start(std::time::Duration::ZERO).await;
    sensors.start(std::time::Duration::ZERO).await;
    series.start(std::time::Duration::ZERO).await;

    let detail = machine.value().unwrap();
    assert_eq!(detail.unit_id, "M-007");
    assert_eq!(detail.status, MachineStatus::Critical);

    let points = sensors.value().unwrap();
    assert_eq!(points.total, 1);
    assert_eq!(points.items[0].torque_nm, Some(41.5));

    let rows = series.value().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].avg_torque_nm, Some(43.0));

    assert_eq!(machine.state().status, SyncStatus::Ready);
    assert_eq!(machine.refetch_interval(), None);
}

#[tokio::test]
async fn test_telemetry_list_keeps_unit_template() {
    let (server, backend, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/telemetry"))
        .and(query_param("unitId", "M-001"))
        .and(query_param("aggregate", "raw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "count": 1 },
            "data": [{ "unit_id": "M-001", "is_failure": true, "failure_type": "TWF" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let template = aegis_api::types::TelemetryParams {
        unit_id: Some("M-001".into()),
        ..aegis_api::types::TelemetryParams::default()
    };
    let list = backend.telemetry_list(template);
    list.start().await;

    let state = list.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.items[0].is_failure, Some(true));
    assert_eq!(state.items[0].failure_type.as_deref(), Some("TWF"));
}
