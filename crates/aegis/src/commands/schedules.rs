//! Maintenance schedule handlers.

use std::time::Duration;

use tabled::Tabled;

use aegis_api::types::ScheduleListParams;
use aegis_core::{Backend, Filter, ListQuery, Schedule};

use crate::cli::{GlobalOpts, ListArgs, SchedulesArgs, SchedulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
}

impl From<&Schedule> for ScheduleRow {
    fn from(s: &Schedule) -> Self {
        Self {
            id: s.schedule_id.clone().unwrap_or_else(|| s.id.clone()),
            unit: output::cell(s.unit_id.as_deref()),
            priority: s.priority.to_string(),
            status: s.status.to_string(),
            risk: output::cell_f64(s.risk_score, 2),
            start: output::cell_time(s.recommended_start),
            end: output::cell_time(s.recommended_end),
        }
    }
}

fn schedule_detail(s: &Schedule) -> String {
    let actions = if s.actions.is_empty() {
        "-".to_owned()
    } else {
        s.actions.join("; ")
    };
    output::detail_block(&[
        ("ID", s.id.clone()),
        ("Schedule", output::cell(s.schedule_id.as_deref())),
        ("Unit", output::cell(s.unit_id.as_deref())),
        ("Product", output::cell(s.product_id.as_deref())),
        ("Priority", s.priority.to_string()),
        ("Status", s.status.to_string()),
        ("Risk score", output::cell_f64(s.risk_score, 2)),
        ("Start", output::cell_time(s.recommended_start)),
        ("End", output::cell_time(s.recommended_end)),
        ("Reason", output::cell(s.reason.as_deref())),
        ("Actions", actions),
        ("Model", output::cell(s.model_version.as_deref())),
        ("Created", output::cell_time(s.created_at)),
    ])
}

async fn list_once(
    backend: &Backend,
    list: &ListArgs,
    status: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let limit = list.limit.unwrap_or(backend.config().page_size).max(1);
    let params = ScheduleListParams {
        page: list.page.max(1),
        limit,
        status,
        search: list.search.clone(),
    };
    let page = backend.schedules(&params).await?;
    let out = output::render_list(
        &global.output,
        &page.items,
        |s| ScheduleRow::from(s),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_page_footer(
        &global.output,
        global.quiet,
        params.page,
        page.total.div_ceil(u64::from(limit)),
        page.total,
    );
    Ok(())
}

async fn list_watch(
    backend: &Backend,
    list: &ListArgs,
    status: Option<&str>,
    every: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut query = ListQuery::new(list.limit.unwrap_or(backend.config().page_size));
    query.set_search(list.search.as_deref());
    query.set_filter(Filter::Status, status);
    query.offset = util::page_offset(list.page, query.limit);

    let sync = backend.schedule_list_with(query);
    let mut stream = sync.subscribe();
    sync.start().await;
    sync.set_refetch_interval(every);

    loop {
        let state = stream.latest();
        util::begin_frame(&global.output);
        let out = output::render_list(
            &global.output,
            state.items.as_slice(),
            |s| ScheduleRow::from(s),
            |s| s.id.clone(),
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

pub async fn handle(
    backend: &Backend,
    args: SchedulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SchedulesCommand::List {
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

        SchedulesCommand::Get { id } => {
            let schedule = backend.schedule(&id).await?;
            let out = output::render_single(&global.output, &schedule, schedule_detail, |s| {
                s.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
