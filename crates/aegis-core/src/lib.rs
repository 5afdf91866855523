//! Domain model, field normalization and data-sync engine between
//! `aegis-api` and AEGIS consumers (the CLI and any future UI).
//!
//! - **[`Backend`]**: Cloneable facade over one API: typed fetches that
//!   return normalized records, authentication, and factories for the
//!   sync instances a view keeps alive.
//!
//! - **Normalization** ([`normalize`]): Turns the backend's mixed
//!   snake_case / camelCase payloads into canonical records. Every field
//!   is read from an ordered list of candidate keys; the first usable one
//!   wins, and derived values (health, status, risk level) are filled in
//!   only when the payload does not supply them.
//!
//! - **[`CollectionSync`] / [`ResourceSync`]**: Per-view state machines
//!   publishing [`SyncState`] / [`ResourceState`] through `watch`
//!   channels. Search input is debounced, filter changes reset to the
//!   first page, superseded responses are discarded by a generation
//!   counter, failures keep the last good data, and each instance owns an
//!   optional polling timer that stops when it is dropped.
//!
//! - **[`Conversation`]**: Copilot chat transcript and relay.

pub mod backend;
pub mod config;
pub mod copilot;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pagination;
pub mod password;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, Panel};
pub use config::{ClientConfig, RefreshIntervals, TlsVerification};
pub use copilot::Conversation;
pub use error::CoreError;
pub use pagination::PageCursor;
pub use password::{PasswordChecks, validate_new_password};
pub use sync::{
    CollectionSource, CollectionSync, Filter, ListQuery, MutationOutcome, ResourceSource,
    ResourceState, ResourceSync, SyncOptions, SyncState, SyncStatus, SyncStream, UserDirectory,
};

pub use model::{
    ActiveTasks, ChatMessage, ChatSender, ChatSession, DashboardSummary, Machine, MachineStatus,
    Page, Recommendation, RiskLevel, RiskOverview, RiskPrediction, RiskSummary, Schedule,
    SchedulePriority, ScheduleStatus, SensorPoint, StatusCounts, SummaryStats, TeamMembers,
    TeamPerformance, TelemetryRow, TimeseriesRow, User,
};
