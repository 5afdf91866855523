use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListEnvelope, TelemetryParams};

impl ApiClient {
    /// Raw or aggregated telemetry rows across the fleet.
    ///
    /// `GET /telemetry?start=&end=&limit=&offset=&aggregate=&unitId=&productId=`
    pub async fn telemetry(&self, params: &TelemetryParams) -> Result<ListEnvelope, Error> {
        self.get("/telemetry", &params.query()).await
    }
}
