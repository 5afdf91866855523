// Machine endpoints
//
// Listing with search/status filters, single-machine detail and the
// per-machine sensor history.

use serde_json::Value;
use tracing::debug;

use super::dashboard::encode_segment;
use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListEnvelope, MachineListParams, SensorParams};

impl ApiClient {
    /// `GET /machines?limit=&offset=&search=&status=`
    pub async fn list_machines(&self, params: &MachineListParams) -> Result<ListEnvelope, Error> {
        self.get("/machines", &params.query()).await
    }

    /// `GET /machines/:unitId`
    pub async fn get_machine(&self, unit_id: &str) -> Result<Value, Error> {
        debug!(unit_id, "fetching machine");
        let path = format!("/machines/{}", encode_segment(unit_id));
        self.get(&path, &[]).await
    }

    /// `GET /machines/:unitId/sensors?start=&end=&interval=&limit=&offset=`
    pub async fn machine_sensors(
        &self,
        unit_id: &str,
        params: &SensorParams,
    ) -> Result<ListEnvelope, Error> {
        let path = format!("/machines/{}/sensors", encode_segment(unit_id));
        self.get(&path, &params.query()).await
    }
}
