// ── User administration ──
//
// A user `CollectionSync` plus create/update/delete. Mutations never
// raise: they report a `MutationOutcome`, and a successful one refetches
// the current page rather than patching it locally.

use aegis_api::types::{NewUser, UserUpdate};
use aegis_api::{ApiClient, ApiErrorInfo};
use serde::Serialize;
use tracing::{info, warn};

use super::collection::{CollectionSync, SyncOptions};
use super::sources::UserSource;
use crate::error::CoreError;

/// Result of a user mutation, suitable for inline display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorInfo>,
}

impl MutationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: ApiErrorInfo) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// Paginated user list with CRUD.
#[derive(Clone)]
pub struct UserDirectory {
    api: ApiClient,
    list: CollectionSync<UserSource>,
}

impl UserDirectory {
    pub fn new(api: ApiClient, options: SyncOptions) -> Self {
        let list = CollectionSync::new(UserSource::new(api.clone()), options);
        Self { api, list }
    }

    /// The underlying list: filters, search, paging, state.
    pub fn list(&self) -> &CollectionSync<UserSource> {
        &self.list
    }

    pub async fn create(&self, user: &NewUser) -> MutationOutcome {
        let result = self.api.create_user(user).await;
        self.settle("create", None, result).await
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> MutationOutcome {
        if update.is_empty() {
            return MutationOutcome::failed(
                CoreError::Validation {
                    message: "Nothing to update".into(),
                }
                .info(),
            );
        }
        let result = self.api.update_user(id, update).await;
        self.settle("update", Some(id), result).await
    }

    pub async fn delete(&self, id: &str) -> MutationOutcome {
        let result = self.api.delete_user(id).await;
        self.settle("delete", Some(id), result).await
    }

    async fn settle<T>(
        &self,
        action: &'static str,
        id: Option<&str>,
        result: Result<T, aegis_api::Error>,
    ) -> MutationOutcome {
        match result {
            Ok(_) => {
                info!(action, id, "user mutation succeeded");
                self.list.refetch().await;
                MutationOutcome::ok()
            }
            Err(e) => {
                let error = CoreError::from(e);
                warn!(action, id, error = %error, "user mutation failed");
                MutationOutcome::failed(error.info())
            }
        }
    }
}
