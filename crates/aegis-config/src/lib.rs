//! Shared configuration for AEGIS tools.
//!
//! TOML profiles layered with `AEGIS_*` environment variables, password
//! resolution (env + keyring + plaintext), translation to
//! `aegis_core::ClientConfig`, and the on-disk session token and chat
//! history the CLI keeps between invocations.

mod history;
mod session;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use aegis_core::{ClientConfig, RefreshIntervals, TlsVerification};

pub use history::ChatHistoryStore;
pub use session::FileSession;

/// Overrides the platform config directory (config file, tokens, history).
pub const CONFIG_DIR_ENV: &str = "AEGIS_CONFIG_DIR";

/// Password used for non-interactive login when the profile names no
/// variable of its own.
pub const PASSWORD_ENV: &str = "AEGIS_PASSWORD";

const KEYRING_SERVICE: &str = "aegis";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to read or write {what}: {message}")]
    Json { what: &'static str, message: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Pick a profile: the explicit name, else `default_profile`, else
    /// `"default"`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:8000/api").
    pub api_url: String,

    /// Login email for non-interactive `auth login`.
    pub email: Option<String>,

    /// Plaintext password; prefer keyring or env var.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Retries for idempotent requests. Unset means none.
    pub max_retries: Option<u32>,

    pub retry_delay_ms: Option<u64>,

    pub page_size: Option<u32>,

    pub search_debounce_ms: Option<u64>,

    /// Dashboard polling periods in seconds; 0 disables a panel's timer.
    #[serde(default, skip_serializing_if = "RefreshSecs::is_empty")]
    pub refresh: RefreshSecs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshSecs {
    pub summary: Option<u64>,
    pub active_tasks: Option<u64>,
    pub team_members: Option<u64>,
    pub team_performance: Option<u64>,
    pub risk_predictions: Option<u64>,
}

impl RefreshSecs {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, base: RefreshIntervals) -> RefreshIntervals {
        let or = |secs: Option<u64>, fallback: Duration| secs.map_or(fallback, Duration::from_secs);
        RefreshIntervals {
            summary: or(self.summary, base.summary),
            active_tasks: or(self.active_tasks, base.active_tasks),
            team_members: or(self.team_members, base.team_members),
            team_performance: or(self.team_performance, base.team_performance),
            risk_predictions: or(self.risk_predictions, base.risk_predictions),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Directory holding `config.toml`, session tokens and chat history.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("io", "aegis", "aegis").map_or_else(dirs_fallback, |dirs| {
        dirs.config_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aegis");
    p
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Token file of one profile.
pub fn session_path(profile_name: &str) -> PathBuf {
    config_dir()
        .join("sessions")
        .join(format!("{profile_name}.token"))
}

pub fn history_path() -> PathBuf {
    config_dir().join("chat-history.json")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path`, then `AEGIS_*` variables (`__` separates
/// nesting levels, e.g. `AEGIS_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AEGIS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// The config as it is written to disk.
pub fn config_to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config_to_toml(cfg)?)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve the login password without prompting.
///
/// Order: the profile's `password_env`, then `AEGIS_PASSWORD`, then the
/// system keyring, then plaintext in the config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    let env_names = profile
        .password_env
        .as_deref()
        .into_iter()
        .chain(std::iter::once(PASSWORD_ENV));
    for name in env_names {
        if let Ok(val) = std::env::var(name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(pw) = keyring_entry(profile_name).and_then(|entry| entry.get_password()) {
        return Ok(SecretString::from(pw));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Remember a password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

// ── Translation to ClientConfig ─────────────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = ClientConfig::new(api_url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.max_retries = profile.max_retries.unwrap_or(0);
    if let Some(ms) = profile.retry_delay_ms {
        config.retry_delay = Duration::from_millis(ms);
    }
    config.page_size = page_size;
    if let Some(ms) = profile.search_debounce_ms {
        config.search_debounce = Duration::from_millis(ms);
    }
    config.refresh = profile.refresh.apply(config.refresh);
    Ok(config)
}
