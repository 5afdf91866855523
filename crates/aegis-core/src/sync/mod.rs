// ── Data-sync engine ──
//
// Per-view state machines over the API: paginated collections with
// debounced search and filter resets, single resources, and independent
// polling timers. State is published through `watch` channels.

mod collection;
mod generation;
mod poll;
mod query;
mod resource;
mod sources;
mod status;
mod stream;
mod users;

pub use collection::{CollectionSource, CollectionSync, SyncOptions};
pub use generation::RequestGeneration;
pub use query::{Filter, ListQuery};
pub use resource::{FnResource, ResourceSource, ResourceSync};
pub use sources::{MachineSource, ScheduleSource, TelemetrySource, UserSource};
pub(crate) use sources::{list_page, paged};
pub use status::{ResourceState, SyncState, SyncStatus};
pub use stream::{SyncStream, SyncWatchStream};
pub use users::{MutationOutcome, UserDirectory};
