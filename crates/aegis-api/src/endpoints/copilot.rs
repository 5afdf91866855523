// Copilot chat endpoint
//
// The reply is free-form: a JSON document when the backend returns one,
// otherwise the raw text wrapped as a JSON string.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::ChatRequest;

impl ApiClient {
    /// `POST /copilot/chat` with `{messages, session_id, context}`
    pub async fn copilot_chat(&self, request: &ChatRequest) -> Result<Value, Error> {
        debug!(
            session_id = %request.session_id,
            turns = request.messages.len(),
            "sending copilot message"
        );
        let raw = self
            .execute_raw(Method::POST, "/copilot/chat", &[], Some(request))
            .await?;
        Ok(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
    }
}
