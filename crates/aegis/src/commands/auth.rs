//! Auth command handlers: login, logout, whoami, change-password.

use std::io::{self, IsTerminal};

use aegis_config::ConfigError;
use aegis_core::User;
use dialoguer::Input;
use secrecy::SecretString;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(u: &User) -> String {
    output::detail_block(&[
        ("ID", u.id.clone()),
        ("Name", output::cell(u.name.as_deref())),
        ("Email", output::cell(u.email.as_deref())),
        ("Role", output::cell(u.role.as_deref())),
        ("Status", output::cell(u.status.as_deref())),
    ])
}

fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    let raw = rpassword::prompt_password(prompt).map_err(util::prompt_err)?;
    Ok(SecretString::from(raw))
}

/// Password from env, keyring or config; prompt only on a terminal.
fn login_password(ctx: &Resolved) -> Result<SecretString, CliError> {
    let profile = ctx.profile.clone().unwrap_or_default();
    match aegis_config::resolve_password(&profile, &ctx.profile_name) {
        Ok(secret) => Ok(secret),
        Err(ConfigError::NoCredentials { .. }) if io::stdin().is_terminal() => {
            prompt_secret("Password: ")
        }
        Err(e) => Err(e.into()),
    }
}

fn login_email(ctx: &Resolved, flag: Option<String>) -> Result<String, CliError> {
    if let Some(email) = flag.or_else(|| ctx.profile.as_ref().and_then(|p| p.email.clone())) {
        return Ok(email);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "pass --email or set email in the profile".into(),
        });
    }
    Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(util::prompt_err)
}

pub async fn handle(ctx: &Resolved, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let backend = &ctx.backend;
    match args.command {
        AuthCommand::Login { email } => {
            let email = login_email(ctx, email)?;
            let password = login_password(ctx)?;
            let user = backend.login(&email, &password).await?;
            if !global.quiet {
                let who = user.name.as_deref().or(user.email.as_deref()).unwrap_or(&email);
                eprintln!("Logged in as {who} (profile '{}')", ctx.profile_name);
            }
            Ok(())
        }

        AuthCommand::Logout => {
            backend.logout().await?;
            if !global.quiet {
                eprintln!("Logged out");
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            if !backend.is_authenticated() {
                return Err(CliError::AuthFailed {
                    message: "not logged in".into(),
                });
            }
            let user = backend.profile().await?;
            let out = output::render_single(&global.output, &user, user_detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::ChangePassword => {
            if !io::stdin().is_terminal() {
                return Err(CliError::NonInteractive {
                    action: "auth change-password".into(),
                });
            }
            let current = prompt_secret("Current password: ")?;
            let new = prompt_secret("New password: ")?;
            let confirm = prompt_secret("Confirm new password: ")?;
            backend.change_password(&current, &new, &confirm).await?;
            if !global.quiet {
                eprintln!("Password changed");
            }
            Ok(())
        }
    }
}
