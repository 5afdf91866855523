//! Telemetry handlers.

use tabled::Tabled;

use aegis_api::types::TelemetryParams;
use aegis_core::{Backend, TelemetryRow};

use crate::cli::{GlobalOpts, TelemetryArgs, TelemetryCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TelemetryTableRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Process K")]
    process: String,
    #[tabled(rename = "RPM")]
    rpm: String,
    #[tabled(rename = "Torque Nm")]
    torque: String,
    #[tabled(rename = "Wear min")]
    wear: String,
    #[tabled(rename = "RUL")]
    rul: String,
    #[tabled(rename = "Failure")]
    failure: String,
}

// Aggregated rows only carry the avg_* fields.
impl From<&TelemetryRow> for TelemetryTableRow {
    fn from(r: &TelemetryRow) -> Self {
        Self {
            time: output::cell_time(r.timestamp),
            unit: output::cell(r.unit_id.as_deref()),
            process: output::cell_f64(r.process_temperature_k.or(r.avg_process_temperature_k), 1),
            rpm: output::cell_f64(r.rotational_speed_rpm.or(r.avg_rotational_speed_rpm), 0),
            torque: output::cell_f64(r.torque_nm.or(r.avg_torque_nm), 1),
            wear: output::cell_f64(r.tool_wear_min.or(r.avg_tool_wear_min), 0),
            rul: output::cell_f64(r.synthetic_rul.or(r.avg_synthetic_rul), 0),
            failure: match (r.is_failure, r.failure_type.as_deref()) {
                (Some(true), Some(kind)) => kind.to_owned(),
                (Some(true), None) => "yes".into(),
                (Some(false), _) => "no".into(),
                (None, _) => "-".into(),
            },
        }
    }
}

pub async fn handle(
    backend: &Backend,
    args: TelemetryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TelemetryCommand::List {
            unit,
            product,
            start,
            end,
            aggregate,
            limit,
            page,
        } => {
            let limit = limit.unwrap_or(TelemetryParams::default().limit).max(1);
            let params = TelemetryParams {
                start,
                end,
                limit,
                offset: util::page_offset(page, limit),
                aggregate,
                unit_id: unit,
                product_id: product,
            };
            let rows = backend.telemetry(&params).await?;
            let out = output::render_list(
                &global.output,
                &rows.items,
                |r| TelemetryTableRow::from(r),
                |r| output::cell_time(r.timestamp),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(
                &global.output,
                global.quiet,
                page.max(1),
                rows.total.div_ceil(u64::from(limit)),
                rows.total,
            );
            Ok(())
        }
    }
}
