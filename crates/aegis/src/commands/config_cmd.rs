//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Input};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with stored passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn validate_url(url: &str) -> Result<(), CliError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "api_url".into(),
            reason: format!("'{url}' must start with http:// or https://"),
        })
    }
}

fn read_password(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(secret)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            if !io::stdin().is_terminal() {
                return Err(CliError::NonInteractive {
                    action: "config init".into(),
                });
            }
            let config_path = config::config_path();
            eprintln!("Aegis configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = aegis_config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("http://localhost:8000/api".into())
                .validate_with(|url: &String| validate_url(url).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(prompt_err)?;

            let email: String = Input::new()
                .with_prompt("Login email (blank to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let page_size: u32 = Input::new()
                .with_prompt("Rows per page")
                .default(cfg.defaults.page_size)
                .interact_text()
                .map_err(prompt_err)?;

            let store = Confirm::new()
                .with_prompt("Store the password in the system keyring now?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;
            if store {
                let password = read_password("Password: ")?;
                aegis_config::store_password(&profile_name, &password)?;
                eprintln!("   Password stored in system keyring");
            }

            let profile = Profile {
                api_url,
                email: Some(email).filter(|e| !e.trim().is_empty()),
                page_size: Some(page_size.max(1)),
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: aegis auth login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let text = aegis_config::config_to_toml(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| text.trim_end().to_owned(),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── SetProfile: non-interactive upsert ──────────────────────
        ConfigCommand::SetProfile {
            name,
            api_url,
            email,
            page_size,
        } => {
            validate_url(&api_url)?;
            if page_size == Some(0) {
                return Err(CliError::Validation {
                    field: "page_size".into(),
                    reason: "must be at least 1".into(),
                });
            }

            let mut cfg = config::load_config()?;
            let first = cfg.profiles.is_empty();
            let profile = cfg.profiles.entry(name.clone()).or_default();
            profile.api_url = api_url;
            if email.is_some() {
                profile.email = email;
            }
            if page_size.is_some() {
                profile.page_size = page_size;
            }
            if first {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Profile '{name}' saved");
            }
            Ok(())
        }

        // ── SetDefault ──────────────────────────────────────────────
        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { name } => {
            let cfg = config::load_config()?;
            let profile_name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }
            if !io::stdin().is_terminal() {
                return Err(CliError::NonInteractive {
                    action: "config set-password".into(),
                });
            }

            let password = read_password("Password: ")?;
            aegis_config::store_password(&profile_name, &password)?;
            eprintln!("Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
