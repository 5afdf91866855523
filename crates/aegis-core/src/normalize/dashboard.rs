use serde_json::{Map, Value};

use super::fields::dashboard as f;
use super::keys::to_camel_case;
use super::record::{Record, round_to_i64};
use crate::model::{
    ActiveTasks, DashboardSummary, StatusCounts, SummaryStats, TeamMembers, TeamPerformance,
};

const SUMMARY_KEYS: [&str; 4] = ["totalMachines", "stats", "statusCounts", "activeFailures"];

/// Summary payloads have no dedicated alias table: keys are camelCased
/// and unmodeled ones are carried in `extra`.
pub fn normalize_summary(raw: &Value) -> DashboardSummary {
    let camel = to_camel_case(raw);
    let r = Record::new(&camel);

    let stats = r
        .first(&f::STATS, |v| v.is_object().then_some(v))
        .map(|block| SummaryStats {
            avg_health: Record::new(block).number(&f::AVG_HEALTH),
            extra: extra_keys(block, &["avgHealth"]),
        })
        .unwrap_or_default();

    let status_counts = r
        .first(&f::STATUS_COUNTS, |v| v.is_object().then_some(v))
        .map(|block| {
            let block = Record::new(block);
            StatusCounts {
                healthy: block.count(&f::HEALTHY).unwrap_or(0),
                warning: block.count(&f::WARNING).unwrap_or(0),
                critical: block.count(&f::CRITICAL).unwrap_or(0),
            }
        })
        .unwrap_or_default();

    DashboardSummary {
        total_machines: r.count(&f::TOTAL_MACHINES).unwrap_or(0),
        stats,
        status_counts,
        active_failures: r.count(&f::ACTIVE_FAILURES).unwrap_or(0),
        extra: extra_keys(&camel, &SUMMARY_KEYS),
    }
}

fn extra_keys(block: &Value, modeled: &[&str]) -> Map<String, Value> {
    block
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(k, v)| !modeled.contains(&k.as_str()) && !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Total is always recomputed from the four counters.
pub fn normalize_active_tasks(raw: &Value) -> ActiveTasks {
    let r = Record::new(raw);
    ActiveTasks::new(
        r.count(&f::IN_PROGRESS).unwrap_or(0),
        r.count(&f::PENDING).unwrap_or(0),
        r.count(&f::COMPLETED).unwrap_or(0),
        r.count(&f::CANCELLED).unwrap_or(0),
    )
}

pub fn normalize_team_members(raw: &Value) -> TeamMembers {
    let r = Record::new(raw);
    TeamMembers {
        total: r.count(&f::TOTAL).unwrap_or(0),
        available: r.count(&f::AVAILABLE).unwrap_or(0),
        on_task: r.count(&f::ON_TASK).unwrap_or(0),
    }
}

pub fn normalize_team_week(raw: &Value) -> TeamPerformance {
    let r = Record::new(raw);
    TeamPerformance {
        name: r.string(&f::WEEK_NAME).unwrap_or_else(|| "Week".into()),
        week_start: r.string(&f::WEEK_START),
        completed: r.count(&f::TASKS_COMPLETED).unwrap_or(0),
        total_scheduled: r.count(&f::TOTAL_SCHEDULED).unwrap_or(0),
        efficiency: r
            .number(&f::EFFICIENCY)
            .and_then(round_to_i64)
            .unwrap_or(0),
    }
}

/// Bare array or `{ data: [...] }`.
pub fn normalize_team_performance(raw: &Value) -> Vec<TeamPerformance> {
    super::rows(raw).iter().map(normalize_team_week).collect()
}
