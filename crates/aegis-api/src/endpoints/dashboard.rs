// Dashboard endpoints
//
// Aggregates behind the overview screen. Payloads are returned raw; the
// core crate normalizes them.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{DashboardMachineParams, ListEnvelope, SummaryParams, TimeseriesParams};

impl ApiClient {
    /// `GET /dashboard/summary?window=&asOf=`
    pub async fn dashboard_summary(&self, params: &SummaryParams) -> Result<Value, Error> {
        self.get("/dashboard/summary", &params.query()).await
    }

    /// `GET /dashboard/machines?limit=&offset=&asOf=`
    pub async fn dashboard_machines(
        &self,
        params: &DashboardMachineParams,
    ) -> Result<ListEnvelope, Error> {
        self.get("/dashboard/machines", &params.query()).await
    }

    /// `GET /dashboard/active-tasks`
    pub async fn active_tasks(&self) -> Result<Value, Error> {
        self.get("/dashboard/active-tasks", &[]).await
    }

    /// `GET /dashboard/team-members`
    pub async fn team_members(&self) -> Result<Value, Error> {
        self.get("/dashboard/team-members", &[]).await
    }

    /// `GET /dashboard/team-perf?weeks=`
    pub async fn team_performance(&self, weeks: u32) -> Result<Value, Error> {
        self.get("/dashboard/team-perf", &[("weeks", weeks.to_string())])
            .await
    }

    /// `GET /dashboard/risk-predictions?limit=`
    pub async fn risk_predictions(&self, limit: u32) -> Result<Value, Error> {
        self.get("/dashboard/risk-predictions", &[("limit", limit.to_string())])
            .await
    }

    /// Averaged sensor series for one machine.
    ///
    /// `GET /dashboard/machine/:unitId/telemetry?start=&end=&interval=`
    pub async fn machine_timeseries(
        &self,
        unit_id: &str,
        params: &TimeseriesParams,
    ) -> Result<Value, Error> {
        let path = format!("/dashboard/machine/{}/telemetry", encode_segment(unit_id));
        self.get(&path, &params.query()).await
    }
}

/// Percent-encode a value used as a single path segment.
pub(crate) fn encode_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
