// ── Paginated collection sync ──
//
// Owns the query of one list view, fetches pages through a
// `CollectionSource`, and publishes `SyncState` over a watch channel.
// Background tasks (search debounce, polling) hold only a weak reference,
// so dropping the last handle tears everything down.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::generation::RequestGeneration;
use super::poll::Poller;
use super::query::{Filter, ListQuery};
use super::status::{SyncState, SyncStatus};
use super::stream::SyncStream;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::Page;
use crate::pagination::PageCursor;

/// Fetches one page of a remote collection.
pub trait CollectionSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    fn fetch(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Page<Self::Item>, CoreError>> + Send;
}

/// Pacing of a sync instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: u32,
    /// Quiet period before typed search input is applied.
    pub search_debounce: Duration,
    /// Zero fetches once and never polls.
    pub refetch_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            search_debounce: Duration::from_millis(500),
            refetch_interval: Duration::ZERO,
        }
    }
}

impl SyncOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: config.search_debounce,
            refetch_interval: Duration::ZERO,
        }
    }

    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }
}

/// Live, paginated view of one remote collection.
pub struct CollectionSync<S: CollectionSource> {
    inner: Arc<Inner<S>>,
}

impl<S: CollectionSource> Clone for CollectionSync<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S: CollectionSource> {
    source: S,
    options: SyncOptions,
    query: Mutex<ListQuery>,
    state: watch::Sender<SyncState<S::Item>>,
    generation: RequestGeneration,
    search: watch::Sender<Option<String>>,
    poller: Poller,
    started: AtomicBool,
    cancel: CancellationToken,
}

impl<S: CollectionSource> Drop for Inner<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<S: CollectionSource> CollectionSync<S> {
    /// Create an idle instance. Nothing is fetched until [`start`](Self::start).
    pub fn new(source: S, options: SyncOptions) -> Self {
        Self::with_query(source, options, ListQuery::new(options.page_size))
    }

    /// Create an idle instance with preset filters.
    pub fn with_query(source: S, options: SyncOptions, query: ListQuery) -> Self {
        let (state, _) = watch::channel(SyncState::idle(query.clone()));
        let (search, _) = watch::channel(query.search.clone());
        let cancel = CancellationToken::new();
        Self {
            inner: Arc::new(Inner {
                source,
                options,
                query: Mutex::new(query),
                state,
                generation: RequestGeneration::default(),
                search,
                poller: Poller::new(cancel.clone()),
                started: AtomicBool::new(false),
                cancel,
            }),
        }
    }

    /// Fetch the first page and start the debounce and polling tasks.
    /// Calling it again only refetches.
    pub async fn start(&self) {
        if !self.inner.started.swap(true, Ordering::SeqCst) {
            tokio::spawn(debounce_task(
                Arc::downgrade(&self.inner),
                self.inner.search.subscribe(),
                self.inner.options.search_debounce,
                self.inner.cancel.child_token(),
            ));
            self.set_refetch_interval(self.inner.options.refetch_interval);
        }
        self.inner.fetch().await;
    }

    // ── Inputs ───────────────────────────────────────────────────────

    /// Change a categorical filter; `"all"` or blank clears it. A change
    /// returns to the first page and refetches.
    pub async fn set_filter(&self, filter: Filter, value: Option<&str>) {
        let changed = self.inner.query.lock().await.set_filter(filter, value);
        if changed {
            debug!(%filter, value, "filter changed");
            self.inner.fetch().await;
        }
    }

    /// Record typed search input. Applied once the input has been quiet
    /// for the debounce period.
    pub fn set_search(&self, value: impl Into<String>) {
        let value = value.into();
        self.inner.search.send_replace(Some(value));
    }

    /// Apply a search term immediately, bypassing the debounce.
    pub async fn apply_search_now(&self, value: Option<&str>) {
        self.inner.search.send_replace(value.map(str::to_owned));
        self.inner.apply_search(value).await;
    }

    pub async fn set_page_size(&self, limit: u32) {
        let changed = self.inner.query.lock().await.set_limit(limit);
        if changed {
            self.inner.fetch().await;
        }
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

    // ── Navigation ───────────────────────────────────────────────────

    /// Returns `false` when already on the last page.
    pub async fn next_page(&self) -> bool {
        self.navigate(|cursor| cursor.next()).await
    }

    /// Returns `false` when already on the first page.
    pub async fn prev_page(&self) -> bool {
        self.navigate(|cursor| cursor.prev()).await
    }

    /// Jump to the zero-based page `index`, clamped to the last page.
    pub async fn go_to_page(&self, index: u64) -> bool {
        self.navigate(|cursor| Some(cursor.at_page(index))).await
    }

    async fn navigate(&self, step: impl FnOnce(&PageCursor) -> Option<PageCursor>) -> bool {
        let moved = {
            let mut query = self.inner.query.lock().await;
            let cursor = PageCursor {
                offset: query.offset,
                limit: query.limit,
                total: self.inner.state.borrow().cursor.total,
            };
            match step(&cursor) {
                Some(next) if next.offset != query.offset => {
                    query.offset = next.offset;
                    true
                }
                _ => false,
            }
        };
        if moved {
            self.inner.fetch().await;
        }
        moved
    }

    /// Re-issue the current query unchanged.
    pub async fn refetch(&self) {
        self.inner.fetch().await;
    }

    // ── Outputs ──────────────────────────────────────────────────────

    pub fn state(&self) -> SyncState<S::Item> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SyncStream<SyncState<S::Item>> {
        SyncStream::new(self.inner.state.subscribe())
    }

    pub async fn query(&self) -> ListQuery {
        self.inner.query.lock().await.clone()
    }

    pub fn refetch_interval(&self) -> Option<Duration> {
        self.inner.poller.period()
    }

    /// Stop polling and debounce tasks. The last state stays readable.
    pub fn shutdown(&self) {
        self.inner.poller.disarm();
        self.inner.cancel.cancel();
    }
}

impl<S: CollectionSource> Inner<S> {
    async fn apply_search(&self, value: Option<&str>) {
        let changed = self.query.lock().await.set_search(value);
        if changed {
            debug!(search = value, "search applied");
            self.fetch().await;
        }
    }

    async fn fetch(&self) {
        loop {
            // Snapshot and generation come from the same critical section.
            let (query, generation) = {
                let query = self.query.lock().await;
                (query.clone(), self.generation.issue())
            };
            self.state.send_if_modified(|state| {
                if !self.generation.is_current(generation) {
                    return false;
                }
                state.status = SyncStatus::Loading;
                state.query = query.clone();
                true
            });
            debug!(generation, offset = query.offset, limit = query.limit, "fetching page");

            let result = self.source.fetch(&query).await;

            if let Ok(page) = &result {
                if self.generation.is_current(generation)
                    && past_the_end(&query, page)
                    && self.pull_back(&query, page.total).await
                {
                    continue;
                }
            }

            self.state.send_if_modified(|state| {
                if !self.generation.is_current(generation) {
                    debug!(generation, "discarding superseded response");
                    return false;
                }
                match result {
                    Ok(page) => {
                        state.cursor = PageCursor {
                            offset: query.offset,
                            limit: query.limit,
                            total: page.total,
                        };
                        state.query = query.clone();
                        state.items = Arc::new(page.items);
                        state.updated_at = Some(Utc::now());
                        state.status = SyncStatus::Ready;
                    }
                    Err(e) => {
                        warn!(error = %e, generation, "page fetch failed; keeping last good page");
                        state.status = SyncStatus::Failed(e.info());
                    }
                }
                true
            });
            return;
        }
    }

    /// Move the offset back inside a collection that shrank under it.
    /// Returns `false` when the query changed meanwhile.
    async fn pull_back(&self, fetched: &ListQuery, total: u64) -> bool {
        let mut query = self.query.lock().await;
        if *query != *fetched {
            return false;
        }
        let cursor = PageCursor {
            offset: query.offset,
            limit: query.limit,
            total,
        }
        .with_total(total);
        debug!(from = query.offset, to = cursor.offset, total, "collection shrank; pulling offset back");
        query.offset = cursor.offset;
        true
    }
}

/// An empty page beyond the reported total is an offset overrun, not an
/// empty result.
fn past_the_end<T>(query: &ListQuery, page: &Page<T>) -> bool {
    page.items.is_empty() && query.offset > 0 && query.offset >= page.total
}

async fn debounce_task<S: CollectionSource>(
    inner: Weak<Inner<S>>,
    mut input: watch::Receiver<Option<String>>,
    quiet: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            changed = input.changed() => if changed.is_err() { return },
        }

        // Restart the quiet period on every further keystroke.
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                changed = input.changed() => if changed.is_err() { return },
                () = tokio::time::sleep(quiet) => break,
            }
        }

        let value = input.borrow_and_update().clone();
        let Some(inner) = inner.upgrade() else {
            return;
        };
        inner.apply_search(value.as_deref()).await;
    }
}
