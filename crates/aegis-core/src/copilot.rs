// ── Copilot conversation ──
//
// Holds the running message list of one chat, relays user turns to
// `POST /copilot/chat`, and appends whatever text the assistant returns.

use aegis_api::ApiClient;
use aegis_api::types::ChatRequest;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ChatMessage, ChatSender, ChatSession};

pub const GREETING: &str = "Hello! How can I help you today?";

/// Session id sent when the caller has none of its own.
pub const DEFAULT_SESSION_ID: &str = "user_123";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Show machines that need maintenance this week",
    "Show the status of machine #",
    "Recommend repairs for my machines",
    "Show machine temperature trends over the last 24 hours",
];

const REPLY_KEYS: [&str; 4] = ["reply", "message", "content", "response"];

/// Assistant text from a chat response: a bare string, or the first
/// textual `reply|message|content|response` field (also under `data`).
pub fn reply_text(body: &Value) -> Option<String> {
    match body {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Object(map) => REPLY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(reply_text)
            .or_else(|| map.get("data").and_then(reply_text)),
        _ => None,
    }
}

fn greeted() -> ChatSession {
    let mut session = ChatSession::new();
    session
        .messages
        .push(ChatMessage::new(ChatSender::Ai, GREETING));
    session
}

/// One chat with the maintenance copilot.
pub struct Conversation {
    api: ApiClient,
    session_id: String,
    session: ChatSession,
}

impl Conversation {
    /// Fresh conversation opened by the assistant greeting.
    pub fn new(api: ApiClient, session_id: impl Into<String>) -> Self {
        Self {
            api,
            session_id: session_id.into(),
            session: greeted(),
        }
    }

    /// Continue an archived conversation.
    pub fn resume(api: ApiClient, session_id: impl Into<String>, session: ChatSession) -> Self {
        Self {
            api,
            session_id: session_id.into(),
            session,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.session.messages
    }

    /// Send one user turn and return the assistant's reply.
    ///
    /// The user message stays in the transcript even if the request fails.
    pub async fn send(&mut self, text: &str) -> Result<&ChatMessage, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Validation {
                message: "Message cannot be empty".into(),
            });
        }

        self.session
            .messages
            .push(ChatMessage::new(ChatSender::User, text));
        self.session.title = self.session.derive_title();

        let request = ChatRequest::user_message(text, self.session_id.as_str());
        debug!(session_id = %self.session_id, chars = text.len(), "sending copilot message");
        let body = self.api.copilot_chat(&request).await?;
        let reply = reply_text(&body).ok_or_else(|| CoreError::InvalidResponse {
            message: "Copilot reply contained no text".into(),
        })?;

        self.session
            .messages
            .push(ChatMessage::new(ChatSender::Ai, reply));
        let last = self.session.messages.len() - 1;
        Ok(&self.session.messages[last])
    }

    /// Start over: hand back the finished session and open a new one.
    pub fn new_chat(&mut self) -> ChatSession {
        std::mem::replace(&mut self.session, greeted())
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_shapes() {
        assert_eq!(reply_text(&json!("  All good. ")).as_deref(), Some("All good."));
        assert_eq!(reply_text(&json!({ "reply": "A" })).as_deref(), Some("A"));
        assert_eq!(reply_text(&json!({ "response": "B", "ok": true })).as_deref(), Some("B"));
        assert_eq!(
            reply_text(&json!({ "data": { "content": "C" } })).as_deref(),
            Some("C")
        );
        assert_eq!(
            reply_text(&json!({ "message": "", "content": "D" })).as_deref(),
            Some("D")
        );
        assert_eq!(reply_text(&json!({ "ok": true })), None);
        assert_eq!(reply_text(&json!(null)), None);
    }
}
