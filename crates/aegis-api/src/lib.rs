// aegis-api: Async Rust client for the AEGIS predictive-maintenance REST API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod retry;
pub mod session;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiErrorInfo, Error, ErrorKind};
pub use retry::RetryPolicy;
pub use session::{MemorySession, Session};
pub use transport::{TlsMode, TransportConfig};
