//! Copilot handlers: one-shot questions, interactive chat, archived history.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use owo_colors::OwoColorize;
use tabled::Tabled;

use aegis_config::ChatHistoryStore;
use aegis_core::copilot::{DEFAULT_SESSION_ID, SUGGESTED_QUESTIONS};
use aegis_core::{Backend, ChatMessage, ChatSender, ChatSession, Conversation};

use crate::cli::{CopilotArgs, CopilotCommand, GlobalOpts, HistoryArgs, HistoryCommand};
use crate::config::history_path;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Messages")]
    messages: usize,
}

impl From<&ChatSession> for SessionRow {
    fn from(s: &ChatSession) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            started: output::cell_time(Some(s.created_at)),
            messages: s.messages.len(),
        }
    }
}

fn speaker(sender: ChatSender, color: bool) -> String {
    let label = match sender {
        ChatSender::User => "you",
        ChatSender::Ai => "copilot",
    };
    match (sender, color) {
        (ChatSender::User, true) => label.cyan().bold().to_string(),
        (ChatSender::Ai, true) => label.magenta().bold().to_string(),
        (_, false) => label.to_owned(),
    }
}

fn transcript(session: &ChatSession, color: bool) -> String {
    let mut lines = vec![format!("{} ({})", session.title, session.id)];
    for m in &session.messages {
        lines.push(format!(
            "[{}] {}: {}",
            m.time.format("%H:%M"),
            speaker(m.sender, color),
            m.message
        ));
    }
    lines.join("\n")
}

fn open_conversation(
    backend: &Backend,
    store: &ChatHistoryStore,
    session: Option<&str>,
) -> Result<Conversation, CliError> {
    let Some(id) = session else {
        return Ok(backend.conversation(DEFAULT_SESSION_ID));
    };
    let archived = store.get(id)?.ok_or_else(|| CliError::NotFound {
        message: format!("no archived conversation '{id}' (see: aegis copilot history list)"),
    })?;
    Ok(Conversation::resume(
        backend.api().clone(),
        DEFAULT_SESSION_ID,
        archived,
    ))
}

/// Send one turn behind a spinner; returns the reply.
async fn send(
    conversation: &mut Conversation,
    text: &str,
    global: &GlobalOpts,
) -> Result<ChatMessage, CliError> {
    let bar = util::spinner("Thinking...", global);
    let result = conversation.send(text).await.cloned();
    bar.finish_and_clear();
    Ok(result?)
}

fn archive(store: &ChatHistoryStore, session: &ChatSession) {
    match store.save(session) {
        Ok(true) => tracing::debug!(id = %session.id, "conversation archived"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "cannot archive conversation"),
    }
}

async fn ask(
    backend: &Backend,
    question: &str,
    session: Option<&str>,
    save: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = ChatHistoryStore::new(history_path());
    let mut conversation = open_conversation(backend, &store, session)?;
    let result = send(&mut conversation, question, global).await;

    // The question is archived even when the reply failed.
    if save {
        archive(&store, conversation.session());
    }
    let reply = result?;

    let out = output::render_single(&global.output, &reply, |m| m.message.clone(), |m| {
        m.message.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn chat(backend: &Backend, session: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractive {
            action: "copilot chat".into(),
        });
    }
    let color = output::should_color(&global.color);
    let store = ChatHistoryStore::new(history_path());
    let mut conversation = open_conversation(backend, &store, session)?;

    for m in conversation.messages() {
        println!("{}: {}", speaker(m.sender, color), m.message);
    }
    eprintln!("(/new starts over, /quit leaves)");

    loop {
        let line: String = Input::new()
            .with_prompt(speaker(ChatSender::User, color))
            .allow_empty(true)
            .interact_text()
            .map_err(util::prompt_err)?;
        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/new" => {
                let finished = conversation.new_chat();
                archive(&store, &finished);
                for m in conversation.messages() {
                    println!("{}: {}", speaker(m.sender, color), m.message);
                }
            }
            text => match send(&mut conversation, text, global).await {
                Ok(reply) => println!("{}: {}", speaker(ChatSender::Ai, color), reply.message),
                // A failed turn stays in the transcript; keep chatting.
                Err(e) => eprintln!("{:?}", miette::Report::new(e)),
            },
        }
    }

    archive(&store, &conversation.into_session());
    Ok(())
}

pub async fn handle(
    backend: &Backend,
    args: CopilotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CopilotCommand::Ask {
            question,
            session,
            no_save,
        } => ask(backend, &question.join(" "), session.as_deref(), !no_save, global).await,

        CopilotCommand::Chat { session } => chat(backend, session.as_deref(), global).await,

        CopilotCommand::Suggestions => suggestions(global),
        CopilotCommand::History(history) => self::history(history, global),
    }
}

/// Starter questions; needs no backend.
pub fn suggestions(global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        SUGGESTED_QUESTIONS.as_slice(),
        |q| SuggestionRow {
            question: (*q).to_owned(),
        },
        |q| (*q).to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Archived conversations live on disk; needs no backend.
pub fn history(args: HistoryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ChatHistoryStore::new(history_path());
    match args.command {
        HistoryCommand::List => {
            let sessions = store.load()?;
            let out = output::render_list(
                &global.output,
                &sessions,
                |s| SessionRow::from(s),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        HistoryCommand::Show { id } => {
            let session = store.get(&id)?.ok_or_else(|| CliError::NotFound {
                message: format!("no archived conversation '{id}'"),
            })?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &session,
                |s| transcript(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        HistoryCommand::Delete { id } => {
            if !store.delete(&id)? {
                return Err(CliError::NotFound {
                    message: format!("no archived conversation '{id}'"),
                });
            }
            if !global.quiet {
                eprintln!("Conversation deleted");
            }
            Ok(())
        }
        HistoryCommand::Clear => {
            if !util::confirm("Delete all archived conversations?", global.yes)? {
                return Ok(());
            }
            store.clear()?;
            if !global.quiet {
                eprintln!("Chat history cleared");
            }
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Try asking")]
    question: String,
}
