// ── Copilot chat types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Title shown for sessions without a user message.
pub const UNTITLED_SESSION: &str = "Untitled conversation";

/// Longest title derived from a first message, in characters.
const TITLE_MAX_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatSender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: ChatSender,
    pub message: String,
    pub time: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: ChatSender, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            message: message.into(),
            time: Utc::now(),
        }
    }
}

/// A conversation, as archived in chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: UNTITLED_SESSION.to_owned(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Title derived from the first user message, truncated on a char boundary.
    pub fn derive_title(&self) -> String {
        let Some(first) = self
            .messages
            .iter()
            .find(|m| m.sender == ChatSender::User && !m.message.trim().is_empty())
        else {
            return UNTITLED_SESSION.to_owned();
        };
        let text = first.message.trim();
        if text.chars().count() <= TITLE_MAX_CHARS {
            return text.to_owned();
        }
        let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
        title.push('…');
        title
    }

    pub fn has_user_messages(&self) -> bool {
        self.messages.iter().any(|m| m.sender == ChatSender::User)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
