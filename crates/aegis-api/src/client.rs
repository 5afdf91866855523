// Async HTTP client for the AEGIS REST API.
//
// Auth: `Authorization: Bearer <token>` read from the injected session on
// every request. Endpoint methods live in `crate::endpoints`.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, SERVER_FALLBACK_MESSAGE};
use crate::retry::RetryPolicy;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Query string pairs, in request order.
pub type Query = Vec<(&'static str, String)>;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the AEGIS backend.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections and the session is shared by reference.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn Session>,
    retry: RetryPolicy,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(
        transport: &TransportConfig,
        session: Arc<dyn Session>,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(transport.base_url.clone()),
            session,
            retry,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers and timeout).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        session: Arc<dyn Session>,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(Url::parse(base_url)?),
            session,
            retry,
        })
    }

    /// Ensure the base path ends with `/` so relative joins keep it.
    fn normalize_base_url(mut url: Url) -> Url {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an endpoint path (e.g. `"/machines"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, Error> {
        self.execute(Method::GET, path, query, None::<&()>).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error> {
        self.execute(Method::POST, path, &[], body).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute(Method::DELETE, path, &[], None::<&()>).await
    }

    // ── Execution ────────────────────────────────────────────────────

    async fn execute<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T, Error> {
        let raw = self.execute_raw(method, path, query, body).await?;
        decode(raw)
    }

    /// Issue a request and return the successful response body as text.
    ///
    /// GET, PUT and DELETE are retried per the [`RetryPolicy`]; POST never is.
    pub(crate) async fn execute_raw<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        let idempotent = matches!(method, Method::GET | Method::PUT | Method::DELETE);
        let mut retries = 0u32;

        loop {
            match self.send_once(&method, &url, query, body).await {
                Ok(text) => return Ok(text),
                Err(e) if idempotent && self.retry.should_retry(retries, &e) => {
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    warn!(
                        error = %e,
                        attempt = retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "{method} {url} failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<B: Serialize + ?Sized + Sync>(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<String, Error> {
        if query.is_empty() {
            debug!("{method} {url}");
        } else {
            debug!("{method} {url} params={query:?}");
        }

        let mut request = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            warn!("authorization rejected, clearing session token");
            self.session.clear();
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| SERVER_FALLBACK_MESSAGE.to_owned());

        if status.is_server_error() {
            Error::Server {
                status: status.as_u16(),
                message,
            }
        } else {
            Error::Client {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Decode a response body; an empty body reads as JSON `null`.
fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    let text = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(text).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
