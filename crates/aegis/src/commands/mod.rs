//! Command dispatch: bridges CLI args -> backend calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod copilot;
pub mod dashboard;
pub mod machines;
pub mod recommendations;
pub mod risk;
pub mod schedules;
pub mod telemetry;
pub mod users;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let backend = &ctx.backend;
    match cmd {
        Command::Auth(args) => auth::handle(ctx, args, global).await,
        Command::Dashboard(args) => dashboard::handle(backend, args, global).await,
        Command::Machines(args) => machines::handle(backend, args, global).await,
        Command::Telemetry(args) => telemetry::handle(backend, args, global).await,
        Command::Schedules(args) => schedules::handle(backend, args, global).await,
        Command::Users(args) => users::handle(backend, args, global).await,
        Command::Risk(args) => risk::handle(backend, args, global).await,
        Command::Recommendations(args) => recommendations::handle(backend, args, global).await,
        Command::Copilot(args) => copilot::handle(backend, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
