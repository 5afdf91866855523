//! AI recommendation handlers.

use tabled::Tabled;

use aegis_core::{Backend, Recommendation};

use crate::cli::{GlobalOpts, RecommendationsArgs, RecommendationsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Prediction")]
    prediction: String,
    #[tabled(rename = "Timeframe")]
    timeframe: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Recommendation> for RecommendationRow {
    fn from(r: &Recommendation) -> Self {
        Self {
            id: r.id.clone(),
            machine: output::cell(r.machine_id.as_deref()),
            severity: output::cell(r.severity.as_deref()),
            prediction: output::cell(r.prediction.as_deref()),
            timeframe: output::cell(r.timeframe.as_deref()),
            confidence: r
                .confidence
                .map_or_else(|| "-".into(), |c| format!("{c:.0}%")),
            status: output::cell(r.status.as_deref()),
        }
    }
}

/// Server-side filter pairs; empty values are not sent.
fn filters(
    machine: Option<String>,
    severity: Option<String>,
    status: Option<String>,
) -> Vec<(&'static str, String)> {
    [
        ("machineId", machine),
        ("severity", severity),
        ("status", status),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (key, v)))
    .collect()
}

pub async fn handle(
    backend: &Backend,
    args: RecommendationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecommendationsCommand::List {
            machine,
            severity,
            status,
        } => {
            let recs = backend
                .recommendations(&filters(machine, severity, status))
                .await?;
            let out = output::render_list(
                &global.output,
                &recs,
                |r| RecommendationRow::from(r),
                |r| r.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
