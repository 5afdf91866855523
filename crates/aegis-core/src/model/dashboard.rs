// ── Dashboard aggregates ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Machine count per health status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: u64,
    pub warning: u64,
    pub critical: u64,
}

/// `stats` block of the summary; unmodeled keys are kept camelCased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub avg_health: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// KPI cards of the overview screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_machines: u64,
    pub stats: SummaryStats,
    pub status_counts: StatusCounts,
    pub active_failures: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Maintenance task counts by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTasks {
    pub in_progress: u64,
    pub pending: u64,
    pub completed: u64,
    pub cancelled: u64,
    /// Always the sum of the four counters.
    pub total: u64,
}

impl ActiveTasks {
    pub fn new(in_progress: u64, pending: u64, completed: u64, cancelled: u64) -> Self {
        Self {
            in_progress,
            pending,
            completed,
            cancelled,
            total: in_progress + pending + completed + cancelled,
        }
    }
}

/// Technician availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembers {
    pub total: u64,
    pub available: u64,
    pub on_task: u64,
}

/// One week of team throughput.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPerformance {
    /// Week label, e.g. `W12`.
    pub name: String,
    pub week_start: Option<String>,
    pub completed: u64,
    pub total_scheduled: u64,
    /// Percentage, rounded.
    pub efficiency: i64,
}
