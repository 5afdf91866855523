use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when the per-request deadline elapses.
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";

/// Fallback when an error response carries neither a message nor a reason phrase.
pub const SERVER_FALLBACK_MESSAGE: &str = "Server error";

/// Fallback when a transport failure has no description.
pub const NETWORK_FALLBACK_MESSAGE: &str = "Network error.";

/// Top-level error type for the `aegis-api` crate.
///
/// Every failure is classified into an [`ErrorKind`] and can be flattened
/// into an [`ApiErrorInfo`] so callers never branch on transport details.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The client-side deadline elapsed before a response arrived.
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// No response was received (connection refused, DNS failure, reset).
    #[error("Network error: {message}")]
    Network { message: String },

    // ── HTTP status ─────────────────────────────────────────────────
    /// The server answered with a 5xx status.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered with a 4xx status (validation, auth, not found).
    #[error("Request rejected (HTTP {status}): {message}")]
    Client { status: u16, message: String },

    // ── Local ───────────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The HTTP client could not be configured (TLS material, headers).
    #[error("HTTP client configuration error: {0}")]
    Config(String),
}

/// Coarse classification used for retry decisions and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Network,
    Server,
    Client,
    /// Failure that happened on this side of the wire.
    Local,
}

/// The normalized `{message, status}` pair handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiErrorInfo {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}

impl std::fmt::Display for ApiErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout => ErrorKind::Timeout,
            Self::Network { .. } => ErrorKind::Network,
            Self::Server { .. } => ErrorKind::Server,
            Self::Client { .. } => ErrorKind::Client,
            Self::InvalidUrl(_) | Self::Deserialization { .. } | Self::Config(_) => {
                ErrorKind::Local
            }
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for timeouts, missing responses and 5xx answers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Timeout | ErrorKind::Network | ErrorKind::Server
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Flatten into the `{message, status}` shape.
    pub fn normalized(&self) -> ApiErrorInfo {
        match self {
            Self::Timeout => ApiErrorInfo::new(TIMEOUT_MESSAGE, None),
            Self::Network { message } if message.is_empty() => {
                ApiErrorInfo::new(NETWORK_FALLBACK_MESSAGE, None)
            }
            Self::Network { message } => ApiErrorInfo::new(message.clone(), None),
            Self::Server { status, message } | Self::Client { status, message } => {
                ApiErrorInfo::new(message.clone(), Some(*status))
            }
            other => ApiErrorInfo::new(other.to_string(), None),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        if e.is_builder() {
            return Self::Config(e.to_string());
        }
        Self::Network {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::Timeout.is_retryable());
        assert!(
            Error::Network {
                message: "connection refused".into()
            }
            .is_retryable()
        );
        assert!(
            Error::Server {
                status: 503,
                message: "down".into()
            }
            .is_retryable()
        );
        assert!(
            !Error::Client {
                status: 422,
                message: "invalid".into()
            }
            .is_retryable()
        );
        assert!(!Error::Config("bad".into()).is_retryable());
    }

    #[test]
    fn normalized_messages() {
        assert_eq!(
            Error::Timeout.normalized(),
            ApiErrorInfo::new("Request timeout. Please try again.", None)
        );
        assert_eq!(
            Error::Network {
                message: String::new()
            }
            .normalized()
            .message,
            "Network error."
        );
        let info = Error::Client {
            status: 401,
            message: "Invalid token".into(),
        }
        .normalized();
        assert_eq!(info.status, Some(401));
        assert_eq!(info.message, "Invalid token");
    }

    #[test]
    fn unauthorized_detection() {
        let err = Error::Client {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::Client);
    }
}
