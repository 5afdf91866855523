//! Machine command handlers.

use std::time::Duration;

use tabled::Tabled;

use aegis_api::types::{MachineListParams, SensorParams, TimeseriesParams};
use aegis_core::{Backend, Filter, ListQuery, Machine, SensorPoint, TimeseriesRow};

use crate::cli::{GlobalOpts, ListArgs, MachinesArgs, MachinesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MachineRow {
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "RUL")]
    rul: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl MachineRow {
    fn new(m: &Machine, color: bool) -> Self {
        Self {
            unit: m.unit_id.clone(),
            name: m.display_name(),
            kind: output::cell(m.machine_type.as_deref()),
            health: m
                .health_percent
                .map_or_else(|| "-".into(), |h| format!("{h}%")),
            status: output::paint_status(m.status, color),
            rul: output::cell_f64(m.synthetic_rul, 0),
            location: output::cell(m.location.as_deref()),
        }
    }
}

fn machine_detail(m: &Machine, color: bool) -> String {
    output::detail_block(&[
        ("Unit", m.unit_id.clone()),
        ("Name", m.display_name()),
        ("Product", output::cell(m.product_id.as_deref())),
        ("Type", output::cell(m.machine_type.as_deref())),
        ("Manufacturer", output::cell(m.manufacturer.as_deref())),
        ("Model", output::cell(m.model.as_deref())),
        ("Location", output::cell(m.location.as_deref())),
        ("Status", output::paint_status(m.status, color)),
        (
            "Health",
            m.health_percent
                .map_or_else(|| "-".into(), |h| format!("{h}%")),
        ),
        ("RUL", output::cell_f64(m.synthetic_rul, 1)),
        ("Process temp (K)", output::cell_f64(m.process_temperature_k, 1)),
        ("Speed (rpm)", output::cell_f64(m.rotational_speed_rpm, 0)),
        ("Tool wear (min)", output::cell_f64(m.tool_wear_min, 0)),
        ("Failure", if m.is_failure { "yes" } else { "no" }.into()),
        ("Installed", output::cell_time(m.install_date)),
        ("Last maintenance", output::cell_time(m.last_maintenance)),
        ("Last seen", output::cell_time(m.last_seen)),
    ])
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Air K")]
    air: String,
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
}

impl From<&SensorPoint> for SensorRow {
    fn from(p: &SensorPoint) -> Self {
        Self {
            time: output::cell_time(p.timestamp),
            air: output::cell_f64(p.air_temperature_k, 1),
            process: output::cell_f64(p.process_temperature_k, 1),
            rpm: output::cell_f64(p.rotational_speed_rpm, 0),
            torque: output::cell_f64(p.torque_nm, 1),
            wear: output::cell_f64(p.tool_wear_min, 0),
            rul: output::cell_f64(p.synthetic_rul, 0),
        }
    }
}

#[derive(Tabled)]
struct TimeseriesTableRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Avg process K")]
    process: String,
    #[tabled(rename = "Avg RPM")]
    rpm: String,
    #[tabled(rename = "Avg torque")]
    torque: String,
    #[tabled(rename = "Avg wear")]
    wear: String,
    #[tabled(rename = "Avg RUL")]
    rul: String,
}

impl From<&TimeseriesRow> for TimeseriesTableRow {
    fn from(r: &TimeseriesRow) -> Self {
        Self {
            time: output::cell_time(r.timestamp),
            process: output::cell_f64(r.avg_process_temperature_k, 1),
            rpm: output::cell_f64(r.avg_rotational_speed_rpm, 0),
            torque: output::cell_f64(r.avg_torque_nm, 1),
            wear: output::cell_f64(r.avg_tool_wear_min, 0),
            rul: output::cell_f64(r.avg_synthetic_rul, 0),
        }
    }
}

// ── List ────────────────────────────────────────────────────────────

async fn list_once(
    backend: &Backend,
    list: &ListArgs,
    status: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let limit = list.limit.unwrap_or(backend.config().page_size).max(1);
    let params = MachineListParams {
        limit,
        offset: util::page_offset(list.page, limit),
        search: list.search.clone(),
        status,
    };
    let page = backend.machines(&params).await?;

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &page.items,
        |m| MachineRow::new(m, color),
        |m| m.unit_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_page_footer(
        &global.output,
        global.quiet,
        list.page.max(1),
        page.total.div_ceil(u64::from(limit)),
        page.total,
    );
    Ok(())
}

/// Keep the list on screen, polled by a `CollectionSync`.
async fn list_watch(
    backend: &Backend,
    list: &ListArgs,
    status: Option<&str>,
    every: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let limit = list.limit.unwrap_or(backend.config().page_size);
    let mut query = ListQuery::new(limit);
    query.set_search(list.search.as_deref());
    query.set_filter(Filter::Status, status);
    query.offset = util::page_offset(list.page, query.limit);

    let sync = backend.machine_list_with(query);
    let mut stream = sync.subscribe();
    sync.start().await;
    sync.set_refetch_interval(every);

    let color = output::should_color(&global.color);
    loop {
        let state = stream.latest();
        util::begin_frame(&global.output);
        let out = output::render_list(
            &global.output,
            state.items.as_slice(),
            |m| MachineRow::new(m, color),
            |m| m.unit_id.clone(),
        )?;
        output::print_output(&out, global.quiet);
        output::print_page_footer(
            &global.output,
            global.quiet,
            state.cursor.page_number(),
            state.total_pages(),
            state.total(),
        );
        if !global.quiet {
            let error = state.error().map(ToString::to_string);
            eprintln!("{}  (Ctrl-C to quit)", util::freshness(state.updated_at, error));
        }

        tokio::select! {
            next = stream.changed() => if next.is_none() { break },
            () = util::interrupted() => break,
        }
    }
    sync.shutdown();
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: MachinesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MachinesCommand::List {
            list,
            status,
            watch,
        } => match watch {
            Some(secs) => {
                let every = Duration::from_secs(secs.max(1));
                list_watch(backend, &list, status.as_deref(), every, global).await
            }
            None => list_once(backend, &list, status, global).await,
        },

        MachinesCommand::Get { unit_id } => {
            let machine = backend.machine(&unit_id).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &machine,
                |m| machine_detail(m, color),
                |m| m.unit_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MachinesCommand::Sensors {
            unit_id,
            start,
            end,
            interval,
            limit,
        } => {
            let params = SensorParams {
                start,
                end,
                interval,
                limit,
                offset: 0,
            };
            let page = backend.machine_sensors(&unit_id, &params).await?;
            let out = output::render_list(
                &global.output,
                &page.items,
                |p| SensorRow::from(p),
                |p| output::cell_time(p.timestamp),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MachinesCommand::Timeseries {
            unit_id,
            start,
            end,
            interval,
        } => {
            let params = TimeseriesParams {
                start,
                end,
                interval,
            };
            let rows = backend.machine_timeseries(&unit_id, &params).await?;
            let out = output::render_list(
                &global.output,
                &rows,
                |r| TimeseriesTableRow::from(r),
                |r| output::cell_time(r.timestamp),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
