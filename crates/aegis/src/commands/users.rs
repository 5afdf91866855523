//! User administration handlers.

use std::io::{self, IsTerminal};

use tabled::Tabled;

use aegis_api::types::{NewUser, UserListParams, UserUpdate};
use aegis_core::{Backend, MutationOutcome, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: output::cell(u.name.as_deref()),
            email: output::cell(u.email.as_deref()),
            role: output::cell(u.role.as_deref()),
            status: output::cell(u.status.as_deref()),
        }
    }
}

fn user_detail(u: &User) -> String {
    output::detail_block(&[
        ("ID", u.id.clone()),
        ("Name", output::cell(u.name.as_deref())),
        ("Email", output::cell(u.email.as_deref())),
        ("Phone", output::cell(u.phone.as_deref())),
        ("Role", output::cell(u.role.as_deref())),
        ("Specialization", output::cell(u.specialization.as_deref())),
        ("Status", output::cell(u.status.as_deref())),
        ("Created", output::cell_time(u.created_at)),
    ])
}

/// A failed outcome becomes an error; success prints `done`.
fn report(outcome: MutationOutcome, done: &str, global: &GlobalOpts) -> Result<(), CliError> {
    match outcome.error {
        Some(info) if !outcome.success => Err(CliError::ApiError {
            message: info.message,
            status: info.status,
        }),
        _ => {
            if !global.quiet {
                eprintln!("{done}");
            }
            Ok(())
        }
    }
}

fn new_password() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractive {
            action: "users create".into(),
        });
    }
    let first = rpassword::prompt_password("Password for the new user: ").map_err(util::prompt_err)?;
    let again = rpassword::prompt_password("Repeat password: ").map_err(util::prompt_err)?;
    if first != again {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }
    if first.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(first)
}

pub async fn handle(backend: &Backend, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List { list, role, status } => {
            let limit = list.limit.unwrap_or(backend.config().page_size).max(1);
            let params = UserListParams {
                page: list.page.max(1),
                limit,
                search: list.search,
                role,
                status,
            };
            let page = backend.users(&params).await?;
            let out = output::render_list(
                &global.output,
                &page.items,
                |u| UserRow::from(u),
                |u| u.id.clone(),
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

        UsersCommand::Get { id } => {
            let user = backend.user(&id).await?;
            let out = output::render_single(&global.output, &user, user_detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            name,
            email,
            role,
            phone,
            specialization,
        } => {
            let user = NewUser {
                name,
                email,
                role,
                password: new_password()?,
                phone,
                specialization,
            };
            let outcome = backend.user_directory().create(&user).await;
            report(outcome, "User created", global)
        }

        UsersCommand::Update {
            id,
            name,
            email,
            role,
            phone,
            specialization,
            status,
        } => {
            let update = UserUpdate {
                name,
                email,
                role,
                phone,
                specialization,
                status,
            };
            let outcome = backend.user_directory().update(&id, &update).await;
            report(outcome, "User updated", global)
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user '{id}'?"), global.yes)? {
                return Ok(());
            }
            let outcome = backend.user_directory().delete(&id).await;
            report(outcome, "User deleted", global)
        }
    }
}
