// ── Single-resource sync ──
//
// Same status machine, generation guard and stale-but-present policy as
// `CollectionSync`, for endpoints that return one value (dashboard panels,
// machine detail, sensor history).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::generation::RequestGeneration;
use super::poll::Poller;
use super::status::{ResourceState, SyncStatus};
use super::stream::SyncStream;
use crate::error::CoreError;

/// Fetches one value.
pub trait ResourceSource: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    fn fetch(&self) -> impl Future<Output = Result<Self::Output, CoreError>> + Send;
}

/// Adapts an async closure into a [`ResourceSource`].
pub struct FnResource<F>(F);

impl<F> FnResource<F> {
    pub fn new(fetch: F) -> Self {
        Self(fetch)
    }
}

impl<T, F, Fut> ResourceSource for FnResource<F>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CoreError>> + Send,
{
    type Output = T;

    fn fetch(&self) -> impl Future<Output = Result<T, CoreError>> + Send {
        (self.0)()
    }
}

/// Live view of one remote value, optionally polled.
pub struct ResourceSync<S: ResourceSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ResourceSource> Clone for ResourceSync<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S: ResourceSource> {
    source: S,
    label: &'static str,
    state: watch::Sender<ResourceState<S::Output>>,
    generation: RequestGeneration,
    poller: Poller,
    cancel: CancellationToken,
}

impl<S: ResourceSource> Drop for Inner<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<S: ResourceSource> ResourceSync<S> {
    /// `label` names the resource in logs.
    pub fn new(label: &'static str, source: S) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        let cancel = CancellationToken::new();
        Self {
            inner: Arc::new(Inner {
                source,
                label,
                state,
                generation: RequestGeneration::default(),
                poller: Poller::new(cancel.clone()),
                cancel,
            }),
        }
    }

    /// Fetch once, then poll every `interval` (zero: fetch once only).
    pub async fn start(&self, interval: Duration) {
        self.set_refetch_interval(interval);
        self.inner.fetch().await;
    }

    pub async fn refetch(&self) {
        self.inner.fetch().await;
    }

    /// Replace the polling period. Zero stops polling.
    pub fn set_refetch_interval(&self, period: Duration) {
        let weak = Arc::downgrade(&self.inner);
        self.inner.poller.arm(period, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return false;
                };
                inner.fetch().await;
                true
            }
        });
    }

    pub fn refetch_interval(&self) -> Option<Duration> {
        self.inner.poller.period()
    }

    pub fn state(&self) -> ResourceState<S::Output> {
        self.inner.state.borrow().clone()
    }

    /// Last good value, if any.
    pub fn value(&self) -> Option<Arc<S::Output>> {
        self.inner.state.borrow().value.clone()
    }

    pub fn subscribe(&self) -> SyncStream<ResourceState<S::Output>> {
        SyncStream::new(self.inner.state.subscribe())
    }

    pub fn shutdown(&self) {
        self.inner.poller.disarm();
        self.inner.cancel.cancel();
    }
}

impl<S: ResourceSource> Inner<S> {
    async fn fetch(&self) {
        let generation = self.generation.issue();
        self.state.send_if_modified(|state| {
            if !self.generation.is_current(generation) {
                return false;
            }
            state.status = SyncStatus::Loading;
            true
        });
        debug!(resource = self.label, generation, "fetching");

        let result = self.source.fetch().await;

        self.state.send_if_modified(|state| {
            if !self.generation.is_current(generation) {
                debug!(resource = self.label, generation, "discarding superseded response");
                return false;
            }
            match result {
                Ok(value) => {
                    state.value = Some(Arc::new(value));
                    state.updated_at = Some(Utc::now());
                    state.status = SyncStatus::Ready;
                }
                Err(e) => {
                    warn!(resource = self.label, error = %e, "refresh failed; keeping last value");
                    state.status = SyncStatus::Failed(e.info());
                }
            }
            true
        });
    }
}
