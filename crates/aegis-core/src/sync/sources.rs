// ── Collection sources for the AEGIS list endpoints ──

use aegis_api::ApiClient;
use aegis_api::types::{
    ListEnvelope, MachineListParams, PagedEnvelope, ScheduleListParams, TelemetryParams,
    UserListParams,
};
use serde_json::Value;

use super::collection::CollectionSource;
use super::query::{Filter, ListQuery};
use crate::error::CoreError;
use crate::model::{Machine, Page, Schedule, TelemetryRow, User};
use crate::normalize::{
    Field, Record, normalize_machine, normalize_schedule, normalize_telemetry_row, normalize_user,
};

const META_TOTAL: Field = Field::new("count", &["count", "total"]);
const PAGINATION_TOTAL: Field = Field::new("total", &["total", "totalCount", "total_count"]);

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

/// Page from a `{ meta: { count }, data }` envelope. Without a count the
/// total is what has been seen so far.
pub(crate) fn list_page<T>(envelope: &ListEnvelope, offset: u64, normalize: fn(&Value) -> T) -> Page<T> {
    let items: Vec<T> = envelope.data.iter().map(normalize).collect();
    let seen = offset.saturating_add(u64::try_from(items.len()).unwrap_or(u64::MAX));
    let total = Record::new(&envelope.meta).count(&META_TOTAL).unwrap_or(seen);
    Page::new(items, total)
}

/// Page from a `{ data, pagination: { total } }` envelope.
pub(crate) fn paged<T>(envelope: &PagedEnvelope, offset: u64, normalize: fn(&Value) -> T) -> Page<T> {
    let items: Vec<T> = envelope.data.iter().map(normalize).collect();
    let seen = offset.saturating_add(u64::try_from(items.len()).unwrap_or(u64::MAX));
    let total = Record::new(&envelope.pagination).count(&PAGINATION_TOTAL).unwrap_or(seen);
    Page::new(items, total)
}

/// `GET /machines`, filtered by `status`.
#[derive(Debug, Clone)]
pub struct MachineSource {
    api: ApiClient,
}

impl MachineSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CollectionSource for MachineSource {
    type Item = Machine;

    async fn fetch(&self, query: &ListQuery) -> Result<Page<Machine>, CoreError> {
        let params = MachineListParams {
            limit: query.limit,
            offset: query.offset,
            search: query.search.clone(),
            status: owned(query.filter(Filter::Status)),
        };
        let envelope = self.api.list_machines(&params).await?;
        Ok(list_page(&envelope, query.offset, normalize_machine))
    }
}

/// `GET /maintenance-schedules`, page-numbered, filtered by `status`.
#[derive(Debug, Clone)]
pub struct ScheduleSource {
    api: ApiClient,
}

impl ScheduleSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CollectionSource for ScheduleSource {
    type Item = Schedule;

    async fn fetch(&self, query: &ListQuery) -> Result<Page<Schedule>, CoreError> {
        let params = ScheduleListParams {
            page: query.page_number(),
            limit: query.limit,
            status: owned(query.filter(Filter::Status)),
            search: query.search.clone(),
        };
        let envelope = self.api.list_schedules(&params).await?;
        Ok(paged(&envelope, query.offset, normalize_schedule))
    }
}

/// `GET /users/data`, page-numbered, filtered by `role` and `status`.
#[derive(Debug, Clone)]
pub struct UserSource {
    api: ApiClient,
}

impl UserSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CollectionSource for UserSource {
    type Item = User;

    async fn fetch(&self, query: &ListQuery) -> Result<Page<User>, CoreError> {
        let params = UserListParams {
            page: query.page_number(),
            limit: query.limit,
            search: query.search.clone(),
            role: owned(query.filter(Filter::Role)),
            status: owned(query.filter(Filter::Status)),
        };
        let envelope = self.api.list_users(&params).await?;
        Ok(paged(&envelope, query.offset, normalize_user))
    }
}

/// `GET /telemetry`, filtered by `unit_id` / `product_id`. Time window and
/// aggregation come from the template parameters.
#[derive(Debug, Clone)]
pub struct TelemetrySource {
    api: ApiClient,
    template: TelemetryParams,
}

impl TelemetrySource {
    pub fn new(api: ApiClient, template: TelemetryParams) -> Self {
        Self { api, template }
    }
}

impl CollectionSource for TelemetrySource {
    type Item = TelemetryRow;

    async fn fetch(&self, query: &ListQuery) -> Result<Page<TelemetryRow>, CoreError> {
        let params = TelemetryParams {
            limit: query.limit,
            offset: query.offset,
            unit_id: owned(query.filter(Filter::UnitId)).or_else(|| self.template.unit_id.clone()),
            product_id: owned(query.filter(Filter::ProductId))
                .or_else(|| self.template.product_id.clone()),
            ..self.template.clone()
        };
        let envelope = self.api.telemetry(&params).await?;
        Ok(list_page(&envelope, query.offset, normalize_telemetry_row))
    }
}
