// ── Canonical domain model ──
//
// One type per entity the normalizer produces. All of them serialize to
// camelCase JSON that the normalizer accepts again unchanged.

pub mod chat;
pub mod dashboard;
pub mod machine;
pub mod recommendation;
pub mod risk;
pub mod schedule;
pub mod sensor;
pub mod telemetry;
pub mod user;

pub use chat::{ChatMessage, ChatSender, ChatSession};
pub use dashboard::{
    ActiveTasks, DashboardSummary, StatusCounts, SummaryStats, TeamMembers, TeamPerformance,
};
pub use machine::{Machine, MachineStatus};
pub use recommendation::Recommendation;
pub use risk::{RiskLevel, RiskOverview, RiskPrediction, RiskSummary};
pub use schedule::{Schedule, SchedulePriority, ScheduleStatus};
pub use sensor::SensorPoint;
pub use telemetry::{TelemetryRow, TimeseriesRow};
pub use user::User;

/// One page of a remote collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total size of the collection across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}
