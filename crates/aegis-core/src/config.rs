// ── Runtime client configuration ──
//
// Describes how to reach the API and how the sync engine paces itself.
// Never touches disk; `aegis-config` resolves profiles into this type.

use std::path::PathBuf;
use std::time::Duration;

use aegis_api::{RetryPolicy, TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Per-panel polling periods for the dashboard. Zero disables polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub summary: Duration,
    pub active_tasks: Duration,
    pub team_members: Duration,
    pub team_performance: Duration,
    pub risk_predictions: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            summary: Duration::from_secs(30),
            active_tasks: Duration::from_secs(60),
            team_members: Duration::from_secs(60),
            team_performance: Duration::from_secs(60),
            risk_predictions: Duration::from_secs(60),
        }
    }
}

/// Configuration for talking to one AEGIS backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., `http://localhost:8000/api`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Retries for idempotent requests. 0 = never retry.
    pub max_retries: u32,
    /// Base delay of the exponential backoff.
    pub retry_delay: Duration,
    /// Default page size for collection syncs.
    pub page_size: u32,
    /// Quiet period applied to free-text search input.
    pub search_debounce: Duration,
    pub refresh: RefreshIntervals,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_delay: Duration::from_millis(1000),
            page_size: 10,
            search_debounce: Duration::from_millis(500),
            refresh: RefreshIntervals::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::new(self.api_url.clone())
            .with_timeout(self.timeout)
            .with_tls(tls)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}
