// Maintenance schedule endpoints (page-numbered).

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{PagedEnvelope, ScheduleListParams};

impl ApiClient {
    /// `GET /maintenance-schedules?page=&limit=&status=&search=`
    pub async fn list_schedules(
        &self,
        params: &ScheduleListParams,
    ) -> Result<PagedEnvelope, Error> {
        self.get("/maintenance-schedules", &params.query()).await
    }

    /// `GET /maintenance-schedules/:id`
    pub async fn get_schedule(&self, id: &str) -> Result<Value, Error> {
        let path = format!(
            "/maintenance-schedules/{}",
            super::dashboard::encode_segment(id)
        );
        self.get(&path, &[]).await
    }
}
