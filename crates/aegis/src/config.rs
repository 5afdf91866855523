//! CLI configuration: thin wrapper around `aegis_config` shared types.
//!
//! Adds the resolution step that respects `GlobalOpts` flag overrides
//! (--api-url, --insecure, --timeout) and opens the profile's session.

use std::sync::Arc;
use std::time::Duration;

use aegis_config::FileSession;
use aegis_core::{Backend, ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use aegis_config::{
    Config, Profile, config_path, history_path, load_config, save_config, session_path,
};

/// Everything a backend-bound command needs.
pub struct Resolved {
    pub profile_name: String,
    /// `None` when running from `--api-url` alone.
    pub profile: Option<Profile>,
    pub backend: Backend,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the backend from the config file, profile, and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        // No profile: build from flags / env alone
        None => {
            let api_url = global.api_url.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile {
                api_url,
                ..Profile::default()
            }
        }
    };
    let from_file = cfg.profiles.contains_key(&profile_name);

    let mut client = aegis_config::profile_to_client_config(&profile, &cfg.defaults)?;
    apply_overrides(&mut client, global)?;

    let session = Arc::new(FileSession::open(session_path(&profile_name)));
    let backend = Backend::new(client, session)?;

    Ok(Resolved {
        profile_name,
        profile: from_file.then_some(profile),
        backend,
    })
}

/// CLI flags take priority over profile values.
fn apply_overrides(client: &mut ClientConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref url) = global.api_url {
        client.api_url = url.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(())
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
