// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aegis_api::types::{ChatRequest, MachineListParams, NewUser, UserListParams};
use aegis_api::{
    ApiClient, Error, ErrorKind, MemorySession, RetryPolicy, Session, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(retry: RetryPolicy) -> (MockServer, ApiClient, Arc<MemorySession>) {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySession::new());
    let transport = TransportConfig::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::new(&transport, session.clone(), retry).unwrap();
    (server, client, session)
}

async fn setup() -> (MockServer, ApiClient, Arc<MemorySession>) {
    setup_with(RetryPolicy::default()).await
}

fn fast_retries(max: u32) -> RetryPolicy {
    RetryPolicy::new(max, Duration::from_millis(1))
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_attaches_bearer() {
    let (server, client, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({ "email": "ops@plant.io", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 7, "name": "Ops" },
            "token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .login("ops@plant.io", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();
    assert_eq!(user["name"], "Ops");
    assert_eq!(
        session.token().map(|t| t.expose_secret().to_owned()),
        Some("tok-123".to_owned())
    );

    let profile = client.profile().await.unwrap();
    assert_eq!(profile["id"], 7);
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let (server, client, session) = setup().await;
    session.set_token(SecretString::from("expired".to_owned()));

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let err = client.profile().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.normalized().message, "Token expired");
    assert_eq!(err.normalized().status, Some(401));
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_logout_clears_token_even_on_failure() {
    let (server, client, session) = setup().await;
    session.set_token(SecretString::from("tok".to_owned()));

    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(!session.is_authenticated());
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_falls_back_to_reason_phrase() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/active-tasks"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client.active_tasks().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.normalized().message, "Service Unavailable");
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_validation_error_keeps_server_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Email already in use" })),
        )
        .mount(&server)
        .await;

    let user = NewUser {
        name: "Dup".into(),
        email: "dup@plant.io".into(),
        role: "technician".into(),
        password: "pw".into(),
        phone: None,
        specialization: None,
    };
    let err = client.create_user(&user).await.unwrap_err();
    assert!(matches!(err, Error::Client { status: 422, .. }));
    assert!(!err.is_retryable());
    assert_eq!(err.normalized().message, "Email already in use");
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let server = MockServer::start().await;
    let transport = TransportConfig::parse(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let client = ApiClient::new(
        &transport,
        Arc::new(MemorySession::new()),
        RetryPolicy::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/dashboard/team-members"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total": 1 }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client.team_members().await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
    assert_eq!(err.normalized().message, "Request timeout. Please try again.");
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_retries_server_errors_until_success() {
    let (server, client, _) = setup_with(fast_retries(2)).await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/summary"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_machines": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client
        .dashboard_summary(&aegis_api::types::SummaryParams::default())
        .await
        .unwrap();
    assert_eq!(summary["total_machines"], 3);
}

#[tokio::test]
async fn test_retry_bound_is_respected() {
    let (server, client, _) = setup_with(fast_retries(1)).await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/team-members"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.team_members().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_default_policy_does_not_retry() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/team-members"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.team_members().await.is_err());
}

#[tokio::test]
async fn test_post_is_never_retried() {
    let (server, client, _) = setup_with(fast_retries(3)).await;

    Mock::given(method("POST"))
        .and(path("/api/copilot/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest::user_message("status of M-1?", "user_123");
    assert!(client.copilot_chat(&request).await.is_err());
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (server, client, _) = setup_with(fast_retries(3)).await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.delete_user("9").await.unwrap_err();
    assert!(err.is_not_found());
}

// ── Query shaping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_users_omits_all_filters() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/data"))
        .and(query_param("page", "3"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "ana"))
        .and(query_param_is_missing("role"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "name": "Ana" }],
            "pagination": { "total": 21, "totalPages": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = UserListParams {
        page: 3,
        limit: 10,
        search: Some("ana".into()),
        role: Some("all".into()),
        status: Some("active".into()),
    };
    let page = client.list_users(&params).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination["total"], 21);
    assert_eq!(page.pagination["totalPages"], 3);
}

#[tokio::test]
async fn test_list_machines_envelope() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "100"))
        .and(query_param("status", "critical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "count": 237, "limit": 50, "offset": 100 },
            "data": [{ "unit_id": "M-101" }, { "unitId": "M-102" }]
        })))
        .mount(&server)
        .await;

    let params = MachineListParams {
        offset: 100,
        status: Some("critical".into()),
        ..MachineListParams::default()
    };
    let envelope = client.list_machines(&params).await.unwrap();
    assert_eq!(envelope.meta["count"], 237);
    assert_eq!(envelope.data.len(), 2);
}

#[tokio::test]
async fn test_machine_path_is_escaped() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/machines/L%2047"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unitId": "L 47" })))
        .expect(1)
        .mount(&server)
        .await;

    let machine = client.get_machine("L 47").await.unwrap();
    assert_eq!(machine["unitId"], "L 47");
}

// ── Copilot ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_copilot_plain_text_reply() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/copilot/chat"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "hello" }],
            "session_id": "user_123",
            "context": {}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("All machines nominal."))
        .mount(&server)
        .await;

    let reply = client
        .copilot_chat(&ChatRequest::user_message("hello", "user_123"))
        .await
        .unwrap();
    assert_eq!(reply, json!("All machines nominal."));
}
