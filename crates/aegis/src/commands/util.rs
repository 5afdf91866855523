//! Shared helpers for command handlers.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractive {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Map an interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offset of a 1-based page.
pub fn page_offset(page: u64, limit: u32) -> u64 {
    page.max(1).saturating_sub(1).saturating_mul(u64::from(limit))
}

/// Spinner on stderr while a slow request runs; hidden when not a terminal.
pub fn spinner(message: &str, global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner().with_message(message.to_owned());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

// ── Watch mode ──────────────────────────────────────────────────────

/// Redraw from the top when writing tables to a terminal.
pub fn begin_frame(format: &OutputFormat) {
    if matches!(format, OutputFormat::Table) && io::stdout().is_terminal() {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x1b[2J\x1b[H");
        let _ = stdout.flush();
    }
}

/// Status line under a watched view: age of the data and the last error.
pub fn freshness(updated_at: Option<DateTime<Utc>>, error: Option<String>) -> String {
    let age = match updated_at {
        Some(at) => {
            let secs = (Utc::now() - at).num_seconds().max(0).unsigned_abs();
            format!(
                "updated {} ago",
                humantime::format_duration(Duration::from_secs(secs))
            )
        }
        None => "waiting for data".into(),
    };
    match error {
        Some(e) => format!("{age} | last refresh failed: {e}"),
        None => age,
    }
}

/// Resolves once Ctrl-C is pressed.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
