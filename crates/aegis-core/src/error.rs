// ── Core error types ──
//
// Errors surfaced by aegis-core. Transport details are folded into a small
// set of domain variants; every variant renders the `{message, status}`
// pair consumers display.

use aegis_api::{ApiErrorInfo, ErrorKind};
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach the AEGIS API: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout. Please try again.")]
    Timeout,

    // ── Server verdicts ──────────────────────────────────────────────
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { message: String, status: u16 },

    #[error("Server error (HTTP {status}): {message}")]
    Server { message: String, status: u16 },

    // ── Local ────────────────────────────────────────────────────────
    #[error("Unexpected response from API: {message}")]
    InvalidResponse { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The normalized `{message, status}` pair.
    pub fn info(&self) -> ApiErrorInfo {
        match self {
            Self::ConnectionFailed { message }
            | Self::InvalidResponse { message }
            | Self::Validation { message }
            | Self::Config { message } => ApiErrorInfo::new(message.clone(), None),
            Self::Timeout => ApiErrorInfo::new(aegis_api::error::TIMEOUT_MESSAGE, None),
            Self::Unauthorized { message } => ApiErrorInfo::new(message.clone(), Some(401)),
            Self::NotFound { message } => ApiErrorInfo::new(message.clone(), Some(404)),
            Self::Rejected { message, status } | Self::Server { message, status } => {
                ApiErrorInfo::new(message.clone(), Some(*status))
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.info().status
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the failure happened before a server verdict.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Server { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aegis_api::Error> for CoreError {
    fn from(err: aegis_api::Error) -> Self {
        let ApiErrorInfo { message, status } = err.normalized();
        match (err.kind(), status) {
            (ErrorKind::Timeout, _) => Self::Timeout,
            (ErrorKind::Network, _) => Self::ConnectionFailed { message },
            (_, Some(401)) => Self::Unauthorized { message },
            (_, Some(404)) => Self::NotFound { message },
            (ErrorKind::Server, Some(status)) => Self::Server { message, status },
            (ErrorKind::Client, Some(status)) => Self::Rejected { message, status },
            _ => match err {
                aegis_api::Error::Deserialization { message, .. } => {
                    Self::InvalidResponse { message }
                }
                _ => Self::Config { message },
            },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse {
            message: err.to_string(),
        }
    }
}
