use std::sync::Arc;

use aegis_api::ApiErrorInfo;
use chrono::{DateTime, Utc};

use super::query::ListQuery;
use crate::pagination::PageCursor;

/// Lifecycle of one sync instance.
///
/// `Idle → Loading → {Ready | Failed}`; every refetch, filter or page
/// change goes back through `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ApiErrorInfo),
}

impl SyncStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn error(&self) -> Option<&ApiErrorInfo> {
        match self {
            Self::Failed(info) => Some(info),
            _ => None,
        }
    }
}

/// Published state of a [`CollectionSync`](super::CollectionSync).
#[derive(Debug, Clone)]
pub struct SyncState<T> {
    pub status: SyncStatus,
    /// Last successfully fetched page. Kept across failures.
    pub items: Arc<Vec<T>>,
    /// Position and total of `items`.
    pub cursor: PageCursor,
    /// Query of the most recently issued request.
    pub query: ListQuery,
    /// When `items` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> SyncState<T> {
    pub(crate) fn idle(query: ListQuery) -> Self {
        Self {
            status: SyncStatus::Idle,
            items: Arc::new(Vec::new()),
            cursor: PageCursor::new(query.limit),
            query,
            updated_at: None,
        }
    }

    pub fn total(&self) -> u64 {
        self.cursor.total
    }

    pub fn total_pages(&self) -> u64 {
        self.cursor.total_pages()
    }

    pub fn has_next(&self) -> bool {
        self.cursor.has_next()
    }

    pub fn has_prev(&self) -> bool {
        self.cursor.has_prev()
    }

    pub fn error(&self) -> Option<&ApiErrorInfo> {
        self.status.error()
    }

    /// Failed, but still showing an earlier page.
    pub fn is_stale(&self) -> bool {
        self.error().is_some() && self.updated_at.is_some()
    }
}

/// Published state of a [`ResourceSync`](super::ResourceSync).
#[derive(Debug)]
pub struct ResourceState<T> {
    pub status: SyncStatus,
    /// Last good value. Kept across failures.
    pub value: Option<Arc<T>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> ResourceState<T> {
    pub fn error(&self) -> Option<&ApiErrorInfo> {
        self.status.error()
    }

    pub fn is_stale(&self) -> bool {
        self.error().is_some() && self.value.is_some()
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            status: SyncStatus::Idle,
            value: None,
            updated_at: None,
        }
    }
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status.clone(),
            value: self.value.clone(),
            updated_at: self.updated_at,
        }
    }
}
