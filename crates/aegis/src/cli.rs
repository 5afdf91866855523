//! Clap derive structures for the `aegis` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aegis -- predictive maintenance from the command line
#[derive(Debug, Parser)]
#[command(
    name = "aegis",
    version,
    about = "Monitor machines and plan maintenance from the command line",
    long_about = "A CLI for the AEGIS predictive-maintenance platform.\n\n\
        Browse machines and telemetry, review risk predictions and\n\
        maintenance schedules, manage users, and ask the maintenance copilot.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "AEGIS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL, e.g. http://localhost:8000/api (overrides profile)
    #[arg(long, short = 'u', env = "AEGIS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AEGIS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "AEGIS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "AEGIS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out, and manage your account
    Auth(AuthArgs),

    /// Fleet overview: summary, tasks, team, risk
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Browse machines, sensors and time series
    #[command(alias = "m")]
    Machines(MachinesArgs),

    /// Query raw or aggregated telemetry
    Telemetry(TelemetryArgs),

    /// Review maintenance schedules
    #[command(alias = "sched")]
    Schedules(SchedulesArgs),

    /// Administer users
    Users(UsersArgs),

    /// Risk predictions per machine
    Risk(RiskArgs),

    /// AI maintenance recommendations
    #[command(alias = "recs")]
    Recommendations(RecommendationsArgs),

    /// Chat with the maintenance copilot
    #[command(alias = "ai")]
    Copilot(CopilotArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared paging arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Rows per page (defaults to the profile's page size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: u64,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and store the session token for this profile
    Login {
        /// Account email (defaults to the profile's email)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// End the session and forget the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Change your password
    ChangePassword,
}

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(subcommand)]
    pub command: DashboardCommand,
}

#[derive(Debug, Subcommand)]
pub enum DashboardCommand {
    /// All dashboard panels at once
    Show,

    /// Fleet health summary
    Summary {
        /// Aggregation window (e.g. 24h, 7d)
        #[arg(long, default_value = "24h")]
        window: String,
    },

    /// Maintenance task counts by status
    Tasks,

    /// Technician availability
    Team,

    /// Weekly completed vs. scheduled work
    Performance {
        /// Number of weeks to include
        #[arg(long, default_value = "8")]
        weeks: u32,
    },

    /// Keep every panel on screen, each refreshing on its own interval
    Watch,
}

// ── Machines ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MachinesArgs {
    #[command(subcommand)]
    pub command: MachinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MachinesCommand {
    /// List machines
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only machines in this state (healthy, warning, critical)
        #[arg(long)]
        status: Option<String>,

        /// Keep the list on screen, refreshing every N seconds
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Show one machine
    Get {
        /// Unit id
        unit_id: String,
    },

    /// Sensor readings for one machine
    Sensors {
        unit_id: String,

        /// Range start (ISO-8601)
        #[arg(long)]
        start: Option<String>,

        /// Range end (ISO-8601)
        #[arg(long)]
        end: Option<String>,

        /// Sampling interval (raw, hourly, daily)
        #[arg(long, default_value = "hourly")]
        interval: String,

        /// Maximum points
        #[arg(long, short = 'l', default_value = "500")]
        limit: u32,
    },

    /// Averaged time series for one machine
    Timeseries {
        unit_id: String,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// Bucket size (e.g. 1h, 1d)
        #[arg(long, default_value = "1h")]
        interval: String,
    },
}

// ── Telemetry ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TelemetryArgs {
    #[command(subcommand)]
    pub command: TelemetryCommand,
}

#[derive(Debug, Subcommand)]
pub enum TelemetryCommand {
    /// List telemetry rows
    #[command(alias = "ls")]
    List {
        /// Only rows for this unit
        #[arg(long)]
        unit: Option<String>,

        /// Only rows for this product
        #[arg(long)]
        product: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// raw, hourly or daily
        #[arg(long, default_value = "raw")]
        aggregate: String,

        #[arg(long, short = 'l')]
        limit: Option<u32>,

        #[arg(long, default_value = "1")]
        page: u64,
    },
}

// ── Schedules ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// List maintenance schedules
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// pending, in_progress, completed or cancelled
        #[arg(long)]
        status: Option<String>,

        /// Keep the list on screen, refreshing every N seconds
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Show one schedule
    Get { id: String },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Show one user
    Get { id: String },

    /// Create a user (prompts for the password)
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "technician")]
        role: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        specialization: Option<String>,
    },

    /// Update fields of a user
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        specialization: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a user
    Delete { id: String },
}

// ── Risk & Recommendations ───────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RiskArgs {
    #[command(subcommand)]
    pub command: RiskCommand,
}

#[derive(Debug, Subcommand)]
pub enum RiskCommand {
    /// Machines ranked by failure risk
    #[command(alias = "ls")]
    List {
        /// Maximum predictions
        #[arg(long, short = 'l', default_value = "10")]
        limit: u32,
    },
}

#[derive(Debug, Args)]
pub struct RecommendationsArgs {
    #[command(subcommand)]
    pub command: RecommendationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecommendationsCommand {
    /// List recommendations
    #[command(alias = "ls")]
    List {
        /// Only recommendations for this machine
        #[arg(long)]
        machine: Option<String>,

        /// low, medium, high or critical
        #[arg(long)]
        severity: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },
}

// ── Copilot ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CopilotArgs {
    #[command(subcommand)]
    pub command: CopilotCommand,
}

#[derive(Debug, Subcommand)]
pub enum CopilotCommand {
    /// Ask one question and print the answer
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Continue an archived conversation
        #[arg(long)]
        session: Option<String>,

        /// Do not archive the exchange
        #[arg(long)]
        no_save: bool,
    },

    /// Interactive chat (type /new to start over, /quit to leave)
    Chat {
        /// Continue an archived conversation
        #[arg(long)]
        session: Option<String>,
    },

    /// Archived conversations
    History(HistoryArgs),

    /// Print suggested starter questions
    Suggestions,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List archived conversations, newest first
    #[command(alias = "ls")]
    List,

    /// Print one conversation
    Show { id: String },

    /// Delete one conversation
    Delete { id: String },

    /// Delete all conversations
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup of a profile
    Init,

    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Create or update a profile non-interactively
    SetProfile {
        name: String,

        #[arg(long)]
        api_url: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Set the default profile
    SetDefault { name: String },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile (defaults to the active profile)
        #[arg(long)]
        name: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
