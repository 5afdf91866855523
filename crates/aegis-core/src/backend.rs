// ── Backend facade ──
//
// Typed, normalized access to one AEGIS API, plus factories for the sync
// instances a consumer keeps alive. Cheaply cloneable via `Arc`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use aegis_api::types::{
    DashboardMachineParams, MachineListParams, ScheduleListParams, SensorParams, SummaryParams,
    TelemetryParams, TimeseriesParams, UserListParams,
};
use aegis_api::{ApiClient, Session};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::copilot::Conversation;
use crate::error::CoreError;
use crate::model::{
    ActiveTasks, DashboardSummary, Machine, Page, Recommendation, RiskOverview, Schedule,
    SensorPoint, TeamMembers, TeamPerformance, TelemetryRow, TimeseriesRow, User,
};
use crate::normalize;
use crate::password::validate_new_password;
use crate::sync::{
    CollectionSync, FnResource, ListQuery, MachineSource, ResourceSource, ResourceSync,
    ScheduleSource, SyncOptions, TelemetrySource, UserDirectory, list_page, paged,
};

/// Offset of the first row on a 1-based page.
fn page_offset(page: u64, limit: u32) -> u64 {
    page.saturating_sub(1).saturating_mul(u64::from(limit))
}

/// Detail responses may wrap the record in `data`.
fn unwrap_data(raw: &serde_json::Value) -> &serde_json::Value {
    raw.get("data").filter(|d| d.is_object()).unwrap_or(raw)
}

#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    config: ClientConfig,
    api: ApiClient,
}

impl Backend {
    /// Build the HTTP client from `config`. Nothing is sent yet.
    pub fn new(config: ClientConfig, session: Arc<dyn Session>) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.transport(), session, config.retry_policy())?;
        debug!(api_url = %config.api_url, "backend configured");
        Ok(Self::from_client(config, api))
    }

    pub fn from_client(config: ClientConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(BackendInner { config, api }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.api.session().is_authenticated()
    }

    fn sync_options(&self) -> SyncOptions {
        SyncOptions::from_config(&self.inner.config)
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and keep the returned token in the session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        let raw = self.inner.api.login(email, password).await?;
        let user = normalize::normalize_user(&raw);
        info!(email, "logged in");
        Ok(user)
    }

    /// Best-effort server logout; the local token is cleared regardless.
    pub async fn logout(&self) -> Result<(), CoreError> {
        self.inner.api.logout().await?;
        info!("logged out");
        Ok(())
    }

    pub async fn profile(&self) -> Result<User, CoreError> {
        Ok(normalize::normalize_user(&self.inner.api.profile().await?))
    }

    /// Validates locally, then `PUT /users/change-password`.
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), CoreError> {
        validate_new_password(current, new, confirm)?;
        self.inner.api.change_password(current, new).await?;
        info!("password changed");
        Ok(())
    }

    // ── Dashboard ────────────────────────────────────────────────────

    pub async fn summary(&self, params: &SummaryParams) -> Result<DashboardSummary, CoreError> {
        let raw = self.inner.api.dashboard_summary(params).await?;
        Ok(normalize::normalize_summary(&raw))
    }

    pub async fn dashboard_machines(
        &self,
        params: &DashboardMachineParams,
    ) -> Result<Page<Machine>, CoreError> {
        let envelope = self.inner.api.dashboard_machines(params).await?;
        Ok(list_page(&envelope, params.offset, normalize::normalize_machine))
    }

    pub async fn active_tasks(&self) -> Result<ActiveTasks, CoreError> {
        Ok(normalize::normalize_active_tasks(
            &self.inner.api.active_tasks().await?,
        ))
    }

    pub async fn team_members(&self) -> Result<TeamMembers, CoreError> {
        Ok(normalize::normalize_team_members(
            &self.inner.api.team_members().await?,
        ))
    }

    pub async fn team_performance(&self, weeks: u32) -> Result<Vec<TeamPerformance>, CoreError> {
        Ok(normalize::normalize_team_performance(
            &self.inner.api.team_performance(weeks).await?,
        ))
    }

    pub async fn risk_overview(&self, limit: u32) -> Result<RiskOverview, CoreError> {
        Ok(normalize::normalize_risk_overview(
            &self.inner.api.risk_predictions(limit).await?,
        ))
    }

    pub async fn machine_timeseries(
        &self,
        unit_id: &str,
        params: &TimeseriesParams,
    ) -> Result<Vec<TimeseriesRow>, CoreError> {
        let raw = self.inner.api.machine_timeseries(unit_id, params).await?;
        Ok(normalize::normalize_timeseries(&raw))
    }

    // ── Machines & telemetry ─────────────────────────────────────────

    pub async fn machines(&self, params: &MachineListParams) -> Result<Page<Machine>, CoreError> {
        let envelope = self.inner.api.list_machines(params).await?;
        Ok(list_page(&envelope, params.offset, normalize::normalize_machine))
    }

    pub async fn machine(&self, unit_id: &str) -> Result<Machine, CoreError> {
        let raw = self.inner.api.get_machine(unit_id).await?;
        Ok(normalize::normalize_machine(unwrap_data(&raw)))
    }

    pub async fn machine_sensors(
        &self,
        unit_id: &str,
        params: &SensorParams,
    ) -> Result<Page<SensorPoint>, CoreError> {
        let envelope = self.inner.api.machine_sensors(unit_id, params).await?;
        Ok(list_page(&envelope, params.offset, normalize::normalize_sensor_point))
    }

    pub async fn telemetry(&self, params: &TelemetryParams) -> Result<Page<TelemetryRow>, CoreError> {
        let envelope = self.inner.api.telemetry(params).await?;
        Ok(list_page(&envelope, params.offset, normalize::normalize_telemetry_row))
    }

    // ── Schedules, users, recommendations ────────────────────────────

    pub async fn schedules(&self, params: &ScheduleListParams) -> Result<Page<Schedule>, CoreError> {
        let envelope = self.inner.api.list_schedules(params).await?;
        Ok(paged(&envelope, page_offset(params.page, params.limit), normalize::normalize_schedule))
    }

    pub async fn schedule(&self, id: &str) -> Result<Schedule, CoreError> {
        let raw = self.inner.api.get_schedule(id).await?;
        Ok(normalize::normalize_schedule(unwrap_data(&raw)))
    }

    pub async fn users(&self, params: &UserListParams) -> Result<Page<User>, CoreError> {
        let envelope = self.inner.api.list_users(params).await?;
        Ok(paged(&envelope, page_offset(params.page, params.limit), normalize::normalize_user))
    }

    pub async fn user(&self, id: &str) -> Result<User, CoreError> {
        let raw = self.inner.api.get_user(id).await?;
        Ok(normalize::normalize_user(unwrap_data(&raw)))
    }

    pub async fn recommendations(
        &self,
        filters: &[(&'static str, String)],
    ) -> Result<Vec<Recommendation>, CoreError> {
        let raw = self.inner.api.recommendations(filters).await?;
        Ok(normalize::normalize_rows(
            &raw,
            normalize::normalize_recommendation,
        ))
    }

    // ── Sync factories ───────────────────────────────────────────────

    pub fn machine_list(&self) -> CollectionSync<MachineSource> {
        self.machine_list_with(ListQuery::new(self.inner.config.page_size))
    }

    /// Machine list seeded with filters, search and page size.
    pub fn machine_list_with(&self, query: ListQuery) -> CollectionSync<MachineSource> {
        CollectionSync::with_query(
            MachineSource::new(self.inner.api.clone()),
            self.sync_options(),
            query,
        )
    }

    pub fn schedule_list(&self) -> CollectionSync<ScheduleSource> {
        self.schedule_list_with(ListQuery::new(self.inner.config.page_size))
    }

    pub fn schedule_list_with(&self, query: ListQuery) -> CollectionSync<ScheduleSource> {
        CollectionSync::with_query(
            ScheduleSource::new(self.inner.api.clone()),
            self.sync_options(),
            query,
        )
    }

    pub fn telemetry_list(&self, template: TelemetryParams) -> CollectionSync<TelemetrySource> {
        CollectionSync::new(
            TelemetrySource::new(self.inner.api.clone(), template),
            self.sync_options(),
        )
    }

    pub fn user_directory(&self) -> UserDirectory {
        UserDirectory::new(self.inner.api.clone(), self.sync_options())
    }

    fn resource<T, F, Fut>(
        &self,
        label: &'static str,
        fetch: F,
    ) -> ResourceSync<impl ResourceSource<Output = T>>
    where
        T: Send + Sync + 'static,
        F: Fn(Backend) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let backend = self.clone();
        ResourceSync::new(label, FnResource::new(move || fetch(backend.clone())))
    }

    pub fn summary_sync(
        &self,
        params: SummaryParams,
    ) -> ResourceSync<impl ResourceSource<Output = DashboardSummary>> {
        self.resource("dashboard summary", move |b| {
            let params = params.clone();
            async move { b.summary(&params).await }
        })
    }

    pub fn active_tasks_sync(&self) -> ResourceSync<impl ResourceSource<Output = ActiveTasks>> {
        self.resource("active tasks", |b| async move { b.active_tasks().await })
    }

    pub fn team_members_sync(&self) -> ResourceSync<impl ResourceSource<Output = TeamMembers>> {
        self.resource("team members", |b| async move { b.team_members().await })
    }

    pub fn team_performance_sync(
        &self,
        weeks: u32,
    ) -> ResourceSync<impl ResourceSource<Output = Vec<TeamPerformance>>> {
        self.resource("team performance", move |b| async move {
            b.team_performance(weeks).await
        })
    }

    pub fn risk_sync(&self, limit: u32) -> ResourceSync<impl ResourceSource<Output = RiskOverview>> {
        self.resource("risk predictions", move |b| async move { b.risk_overview(limit).await })
    }

    pub fn machine_sync(
        &self,
        unit_id: impl Into<String>,
    ) -> ResourceSync<impl ResourceSource<Output = Machine>> {
        let unit_id: Arc<str> = Arc::from(unit_id.into());
        self.resource("machine detail", move |b| {
            let unit_id = Arc::clone(&unit_id);
            async move { b.machine(&unit_id).await }
        })
    }

    pub fn sensors_sync(
        &self,
        unit_id: impl Into<String>,
        params: SensorParams,
    ) -> ResourceSync<impl ResourceSource<Output = Page<SensorPoint>>> {
        let unit_id: Arc<str> = Arc::from(unit_id.into());
        self.resource("machine sensors", move |b| {
            let unit_id = Arc::clone(&unit_id);
            let params = params.clone();
            async move { b.machine_sensors(&unit_id, &params).await }
        })
    }

    pub fn timeseries_sync(
        &self,
        unit_id: impl Into<String>,
        params: TimeseriesParams,
    ) -> ResourceSync<impl ResourceSource<Output = Vec<TimeseriesRow>>> {
        let unit_id: Arc<str> = Arc::from(unit_id.into());
        self.resource("machine timeseries", move |b| {
            let unit_id = Arc::clone(&unit_id);
            let params = params.clone();
            async move { b.machine_timeseries(&unit_id, &params).await }
        })
    }

    /// Default polling period of a dashboard panel.
    pub fn panel_interval(&self, panel: Panel) -> Duration {
        let refresh = &self.inner.config.refresh;
        match panel {
            Panel::Summary => refresh.summary,
            Panel::ActiveTasks => refresh.active_tasks,
            Panel::TeamMembers => refresh.team_members,
            Panel::TeamPerformance => refresh.team_performance,
            Panel::RiskPredictions => refresh.risk_predictions,
        }
    }

    // ── Copilot ──────────────────────────────────────────────────────

    pub fn conversation(&self, session_id: impl Into<String>) -> Conversation {
        Conversation::new(self.inner.api.clone(), session_id)
    }
}

/// Independently polled dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Summary,
    ActiveTasks,
    TeamMembers,
    TeamPerformance,
    RiskPredictions,
}
