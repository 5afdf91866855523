//! Dashboard handlers: individual panels, the combined view, and watch mode.
//!
//! Every panel is fetched independently; one failing panel is reported
//! inline and never hides the others.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use aegis_api::ApiErrorInfo;
use aegis_api::types::SummaryParams;
use aegis_core::{
    ActiveTasks, Backend, CoreError, DashboardSummary, Panel, ResourceState, RiskOverview,
    TeamMembers, TeamPerformance,
};

use crate::cli::{DashboardArgs, DashboardCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{risk, util};

const DEFAULT_WEEKS: u32 = 8;
const RISK_ROWS: u32 = 10;

// ── Panel renderers ─────────────────────────────────────────────────

fn summary_detail(s: &DashboardSummary) -> String {
    output::detail_block(&[
        ("Machines", s.total_machines.to_string()),
        (
            "Avg health",
            s.stats
                .avg_health
                .map_or_else(|| "-".into(), |h| format!("{h:.1}%")),
        ),
        ("Healthy", s.status_counts.healthy.to_string()),
        ("Warning", s.status_counts.warning.to_string()),
        ("Critical", s.status_counts.critical.to_string()),
        ("Active failures", s.active_failures.to_string()),
    ])
}

fn tasks_detail(t: &ActiveTasks) -> String {
    output::detail_block(&[
        ("In progress", t.in_progress.to_string()),
        ("Pending", t.pending.to_string()),
        ("Completed", t.completed.to_string()),
        ("Cancelled", t.cancelled.to_string()),
        ("Total", t.total.to_string()),
    ])
}

fn team_detail(t: &TeamMembers) -> String {
    output::detail_block(&[
        ("Technicians", t.total.to_string()),
        ("Available", t.available.to_string()),
        ("On task", t.on_task.to_string()),
    ])
}

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Completed")]
    completed: u64,
    #[tabled(rename = "Scheduled")]
    scheduled: u64,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

impl From<&TeamPerformance> for PerformanceRow {
    fn from(p: &TeamPerformance) -> Self {
        Self {
            week: p.name.clone(),
            start: output::cell(p.week_start.as_deref()),
            completed: p.completed,
            scheduled: p.total_scheduled,
            efficiency: format!("{}%", p.efficiency),
        }
    }
}

fn performance_table(rows: &[TeamPerformance]) -> String {
    let rows: Vec<PerformanceRow> = rows.iter().map(|p| PerformanceRow::from(p)).collect();
    output::table(&rows)
}

// ── Combined view ───────────────────────────────────────────────────

/// All panels; a missing panel carries its error in `errors`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardView {
    summary: Option<DashboardSummary>,
    active_tasks: Option<ActiveTasks>,
    team_members: Option<TeamMembers>,
    team_performance: Option<Vec<TeamPerformance>>,
    risk_predictions: Option<RiskOverview>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<&'static str, ApiErrorInfo>,
}

impl DashboardView {
    fn keep<T>(&mut self, panel: &'static str, result: Result<T, CoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.insert(panel, e.info());
                None
            }
        }
    }

    fn take<T: Clone>(&mut self, panel: &'static str, state: &ResourceState<T>) -> Option<T> {
        if let Some(error) = state.error() {
            self.errors.insert(panel, error.clone());
        }
        state.value.as_deref().cloned()
    }

    fn render(&self, color: bool) -> String {
        let mut out = String::new();
        let mut section = |title: &str, panel: &str, body: Option<String>| {
            let _ = writeln!(out, "── {title} ──");
            match (body, self.errors.get(panel)) {
                (Some(body), Some(err)) => {
                    let _ = writeln!(out, "{body}\n(stale: {err})");
                }
                (Some(body), None) => {
                    let _ = writeln!(out, "{body}");
                }
                (None, Some(err)) => {
                    let _ = writeln!(out, "unavailable: {err}");
                }
                (None, None) => {
                    let _ = writeln!(out, "loading...");
                }
            }
            let _ = writeln!(out);
        };
        section("Summary", "summary", self.summary.as_ref().map(summary_detail));
        section("Active tasks", "activeTasks", self.active_tasks.as_ref().map(tasks_detail));
        section("Team", "teamMembers", self.team_members.as_ref().map(team_detail));
        section(
            "Team performance",
            "teamPerformance",
            self.team_performance.as_deref().map(performance_table),
        );
        section(
            "Risk predictions",
            "riskPredictions",
            self.risk_predictions
                .as_ref()
                .map(|o| format!("{}\n{}", risk::risk_table(o, color), risk::summary_line(o))),
        );
        out.trim_end().to_owned()
    }
}

fn print_view(view: &DashboardView, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        view,
        |v| v.render(color),
        |v| {
            v.summary
                .as_ref()
                .map(|s| s.total_machines.to_string())
                .unwrap_or_default()
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn show(backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    let params = SummaryParams::default();
    let (summary, tasks, team, performance, risk) = tokio::join!(
        backend.summary(&params),
        backend.active_tasks(),
        backend.team_members(),
        backend.team_performance(DEFAULT_WEEKS),
        backend.risk_overview(RISK_ROWS),
    );

    // Fail outright only when every panel failed.
    let first_error = [
        summary.as_ref().err(),
        tasks.as_ref().err(),
        team.as_ref().err(),
        performance.as_ref().err(),
        risk.as_ref().err(),
    ]
    .into_iter()
    .collect::<Option<Vec<_>>>()
    .and_then(|errors| errors.first().map(|e| (*e).clone()));
    if let Some(err) = first_error {
        return Err(err.into());
    }

    let mut view = DashboardView::default();
    view.summary = view.keep("summary", summary);
    view.active_tasks = view.keep("activeTasks", tasks);
    view.team_members = view.keep("teamMembers", team);
    view.team_performance = view.keep("teamPerformance", performance);
    view.risk_predictions = view.keep("riskPredictions", risk);
    print_view(&view, global)
}

/// Poll every panel on its own interval until Ctrl-C.
async fn watch(backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = backend.summary_sync(SummaryParams::default());
    let tasks = backend.active_tasks_sync();
    let team = backend.team_members_sync();
    let performance = backend.team_performance_sync(DEFAULT_WEEKS);
    let risk = backend.risk_sync(RISK_ROWS);

    let mut summary_rx = summary.subscribe();
    let mut tasks_rx = tasks.subscribe();
    let mut team_rx = team.subscribe();
    let mut performance_rx = performance.subscribe();
    let mut risk_rx = risk.subscribe();

    tokio::join!(
        summary.start(backend.panel_interval(Panel::Summary)),
        tasks.start(backend.panel_interval(Panel::ActiveTasks)),
        team.start(backend.panel_interval(Panel::TeamMembers)),
        performance.start(backend.panel_interval(Panel::TeamPerformance)),
        risk.start(backend.panel_interval(Panel::RiskPredictions)),
    );

    loop {
        let mut view = DashboardView::default();
        view.summary = view.take("summary", &summary.state());
        view.active_tasks = view.take("activeTasks", &tasks.state());
        view.team_members = view.take("teamMembers", &team.state());
        view.team_performance = view.take("teamPerformance", &performance.state());
        view.risk_predictions = view.take("riskPredictions", &risk.state());

        util::begin_frame(&global.output);
        print_view(&view, global)?;
        if !global.quiet {
            let newest = [
                summary.state().updated_at,
                tasks.state().updated_at,
                team.state().updated_at,
                performance.state().updated_at,
                risk.state().updated_at,
            ]
            .into_iter()
            .flatten()
            .max();
            eprintln!("{}  (Ctrl-C to quit)", util::freshness(newest, None));
        }

        tokio::select! {
            Some(_) = summary_rx.changed() => {}
            Some(_) = tasks_rx.changed() => {}
            Some(_) = team_rx.changed() => {}
            Some(_) = performance_rx.changed() => {}
            Some(_) = risk_rx.changed() => {}
            () = util::interrupted() => break,
            else => break,
        }
    }

    summary.shutdown();
    tasks.shutdown();
    team.shutdown();
    performance.shutdown();
    risk.shutdown();
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DashboardCommand::Show => show(backend, global).await,
        DashboardCommand::Watch => watch(backend, global).await,

        DashboardCommand::Summary { window } => {
            let summary = backend.summary(&SummaryParams { window, as_of: None }).await?;
            let out = output::render_single(&global.output, &summary, summary_detail, |s| {
                s.total_machines.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DashboardCommand::Tasks => {
            let tasks = backend.active_tasks().await?;
            let out = output::render_single(&global.output, &tasks, tasks_detail, |t| {
                t.total.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DashboardCommand::Team => {
            let team = backend.team_members().await?;
            let out = output::render_single(&global.output, &team, team_detail, |t| {
                t.available.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DashboardCommand::Performance { weeks } => {
            let rows = backend.team_performance(weeks).await?;
            let out = output::render_list(
                &global.output,
                &rows,
                |p| PerformanceRow::from(p),
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
