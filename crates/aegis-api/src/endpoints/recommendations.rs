use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// AI maintenance recommendations, optionally filtered server-side.
    ///
    /// `GET /recommendations?<filters>`
    pub async fn recommendations(
        &self,
        filters: &[(&'static str, String)],
    ) -> Result<Value, Error> {
        self.get("/recommendations", filters).await
    }
}
