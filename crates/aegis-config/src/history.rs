// Archived copilot conversations
//
// One JSON file holding every archived `ChatSession`, newest first.
// Sessions without a user message are never stored.

use std::path::{Path, PathBuf};

use aegis_core::ChatSession;
use tracing::debug;

use crate::ConfigError;

#[derive(Debug, Clone)]
pub struct ChatHistoryStore {
    path: PathBuf,
}

fn json_error(e: &serde_json::Error) -> ConfigError {
    ConfigError::Json {
        what: "chat history",
        message: e.to_string(),
    }
}

impl ChatHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All archived sessions, newest first. A missing file is empty history.
    pub fn load(&self) -> Result<Vec<ChatSession>, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| json_error(&e))
    }

    pub fn get(&self, id: &str) -> Result<Option<ChatSession>, ConfigError> {
        Ok(self.load()?.into_iter().find(|s| s.id == id))
    }

    /// Insert or replace `session`, moving it to the front. Returns
    /// `false` when it has no user message and was skipped.
    pub fn save(&self, session: &ChatSession) -> Result<bool, ConfigError> {
        if !session.has_user_messages() {
            return Ok(false);
        }
        let mut sessions = self.load()?;
        sessions.retain(|s| s.id != session.id);
        sessions.insert(0, session.clone());
        self.write(&sessions)?;
        debug!(id = %session.id, total = sessions.len(), "chat session archived");
        Ok(true)
    }

    /// Returns whether a session was removed.
    pub fn delete(&self, id: &str) -> Result<bool, ConfigError> {
        let mut sessions = self.load()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.write(&sessions)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, sessions: &[ChatSession]) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(sessions).map_err(|e| json_error(&e))?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}
