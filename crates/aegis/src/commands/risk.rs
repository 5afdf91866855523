//! Risk prediction handlers.

use tabled::Tabled;

use aegis_core::{Backend, RiskOverview, RiskPrediction};

use crate::cli::{GlobalOpts, RiskArgs, RiskCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct RiskRow {
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Failure %")]
    probability: String,
    #[tabled(rename = "Primary risk")]
    primary: String,
    #[tabled(rename = "Time to failure")]
    ttf: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
}

impl RiskRow {
    pub(crate) fn new(p: &RiskPrediction, color: bool) -> Self {
        Self {
            machine: p.machine_id.clone(),
            name: p.machine_name.clone(),
            risk: p.risk_score.to_string(),
            level: output::paint_risk(p.risk_level, color),
            probability: format!("{}%", p.failure_probability),
            primary: p.primary_risk.clone(),
            ttf: p.time_to_failure.clone(),
            schedule: output::cell(p.schedule_id.as_deref()),
        }
    }
}

pub(crate) fn risk_table(overview: &RiskOverview, color: bool) -> String {
    let rows: Vec<RiskRow> = overview
        .predictions
        .iter()
        .map(|p| RiskRow::new(p, color))
        .collect();
    output::table(&rows)
}

/// Band counts line shown under the table.
pub(crate) fn summary_line(overview: &RiskOverview) -> String {
    let s = &overview.summary;
    format!(
        "{} machines: {} critical, {} high, {} medium, {} low",
        s.total(),
        s.critical,
        s.high,
        s.medium,
        s.low
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(backend: &Backend, args: RiskArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RiskCommand::List { limit } => {
            let overview = backend.risk_overview(limit).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &overview,
                |o| format!("{}\n{}", risk_table(o, color), summary_line(o)),
                |o| {
                    o.predictions
                        .iter()
                        .map(|p| p.machine_id.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
