// Behaviour of the sync engine against a scripted in-memory source.
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use aegis_core::{
    CollectionSource, CollectionSync, CoreError, Filter, ListQuery, Page, ResourceSync,
    SyncOptions, SyncStatus,
};
use aegis_core::sync::FnResource;

// ── Fake source ─────────────────────────────────────────────────────

struct Step {
    delay: Duration,
    result: Result<Page<String>, CoreError>,
}

/// Answers from `script` in order, then with one row per request naming
/// its offset, out of `total`.
#[derive(Clone)]
struct FakeSource {
    total: u64,
    calls: Arc<Mutex<Vec<ListQuery>>>,
    script: Arc<Mutex<VecDeque<Step>>>,
}

impl FakeSource {
    fn new(total: u64) -> Self {
        Self {
            total,
            calls: Arc::default(),
            script: Arc::default(),
        }
    }

    fn then(&self, delay: Duration, result: Result<Page<String>, CoreError>) -> &Self {
        self.script.lock().unwrap().push_back(Step { delay, result });
        self
    }

    fn calls(&self) -> Vec<ListQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CollectionSource for FakeSource {
    type Item = String;

    async fn fetch(&self, query: &ListQuery) -> Result<Page<String>, CoreError> {
        self.calls.lock().unwrap().push(query.clone());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step { delay, result }) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Ok(Page::new(vec![format!("row-{}", query.offset)], self.total)),
        }
    }
}

fn rows(names: &[&str]) -> Page<String> {
    Page::new(names.iter().map(|n| (*n).to_owned()).collect(), 237)
}

fn server_error() -> CoreError {
    CoreError::Server {
        message: "Internal Server Error".into(),
        status: 500,
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_status_moves_idle_loading_ready() {
    let source = FakeSource::new(237);
    source.then(Duration::from_secs(1), Ok(rows(&["M-1", "M-2"])));
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    assert_eq!(sync.state().status, SyncStatus::Idle);

    let mut stream = sync.subscribe();
    let task = tokio::spawn({
        let sync = sync.clone();
        async move { sync.start().await }
    });

    let loading = stream.wait_for(|s| s.status.is_loading()).await.unwrap();
    assert!(loading.items.is_empty());

    task.await.unwrap();
    let state = sync.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(*state.items, vec!["M-1".to_owned(), "M-2".to_owned()]);
    assert_eq!(state.total(), 237);
    assert!(state.updated_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_last_good_page() {
    let source = FakeSource::new(237);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;
    let before = sync.state();
    assert_eq!(*before.items, vec!["row-0".to_owned()]);

    source.then(Duration::ZERO, Err(server_error()));
    sync.refetch().await;

    let after = sync.state();
    assert_eq!(after.items, before.items);
    assert_eq!(after.cursor, before.cursor);
    let error = after.error().unwrap();
    assert_eq!(error.status, Some(500));
    assert_eq!(error.message, "Internal Server Error");

    // Next success clears the error.
    sync.refetch().await;
    assert!(sync.state().status.is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_response_is_discarded() {
    let source = FakeSource::new(237);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;

    source
        .then(Duration::from_secs(5), Ok(rows(&["old"])))
        .then(Duration::from_secs(1), Ok(rows(&["new"])));

    let slow = tokio::spawn({
        let sync = sync.clone();
        async move { sync.refetch().await }
    });
    settle().await;
    sync.refetch().await;
    assert_eq!(*sync.state().items, vec!["new".to_owned()]);

    slow.await.unwrap();
    assert_eq!(*sync.state().items, vec!["new".to_owned()]);
    assert!(sync.state().status.is_ready());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_filter_changes_settle_on_latest_query() {
    let source = FakeSource::new(237);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let sync = sync.clone();
            tokio::spawn(async move {
                sync.set_filter(Filter::Status, Some(&format!("s{i}"))).await;
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let state = sync.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.query, sync.query().await);
}

// ── Inputs ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_search_is_debounced() {
    let source = FakeSource::new(3);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;
    let mut stream = sync.subscribe();

    for prefix in ["t", "tu", "tur", "turb", "turbi", "turbin", "turbine"] {
        sync.set_search(prefix);
        tokio::time::advance(Duration::from_millis(50)).await;
    }
    // Still inside the quiet period: nothing sent yet.
    settle().await;
    assert_eq!(source.call_count(), 1);

    let state = stream
        .wait_for(|s| s.status.is_ready() && s.query.search.as_deref() == Some("turbine"))
        .await
        .unwrap();
    assert_eq!(state.query.offset, 0);

    let searches: Vec<Option<String>> = source.calls().into_iter().map(|q| q.search).collect();
    assert_eq!(searches, vec![None, Some("turbine".to_owned())]);
}

#[tokio::test(start_paused = true)]
async fn test_apply_search_now_skips_the_debounce() {
    let source = FakeSource::new(3);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;

    sync.apply_search_now(Some("pump")).await;
    assert_eq!(sync.state().query.search.as_deref(), Some("pump"));
    assert_eq!(source.call_count(), 2);

    // The debounce task sees a value already applied and sends nothing.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_returns_to_first_page() {
    let source = FakeSource::new(237);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;
    assert!(sync.next_page().await);
    assert!(sync.next_page().await);
    assert_eq!(sync.query().await.offset, 20);

    sync.set_filter(Filter::Status, Some("critical")).await;
    let last = source.calls().pop().unwrap();
    assert_eq!(last.offset, 0);
    assert_eq!(last.filter(Filter::Status), Some("critical"));

    // Same value again: no request.
    let count = source.call_count();
    sync.set_filter(Filter::Status, Some("critical")).await;
    assert_eq!(source.call_count(), count);

    // "all" clears the filter.
    sync.set_filter(Filter::Status, Some("all")).await;
    assert_eq!(source.calls().pop().unwrap().filter(Filter::Status), None);
}

#[tokio::test(start_paused = true)]
async fn test_page_navigation_bounds() {
    let source = FakeSource::new(237);
    let options = SyncOptions {
        page_size: 50,
        ..SyncOptions::default()
    };
    let sync = CollectionSync::new(source.clone(), options);
    sync.start().await;
    assert!(!sync.prev_page().await);

    assert!(sync.go_to_page(999).await);
    let state = sync.state();
    assert_eq!(state.cursor.offset, 200);
    assert_eq!(state.total_pages(), 5);
    assert!(!state.has_next());
    assert!(!sync.next_page().await);

    assert!(sync.prev_page().await);
    assert_eq!(sync.state().cursor.offset, 150);
}

#[tokio::test(start_paused = true)]
async fn test_page_size_change_resets_offset() {
    let source = FakeSource::new(237);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;
    sync.next_page().await;

    sync.set_page_size(25).await;
    let last = source.calls().pop().unwrap();
    assert_eq!((last.offset, last.limit), (0, 25));
}

#[tokio::test(start_paused = true)]
async fn test_shrunken_collection_pulls_offset_back() {
    let source = FakeSource::new(11);
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;
    assert!(sync.next_page().await);
    assert_eq!(sync.state().cursor.offset, 10);

    // The only row on the last page is gone.
    source
        .then(Duration::ZERO, Ok(Page::new(vec![], 10)))
        .then(Duration::ZERO, Ok(Page::new(vec!["row-0".to_owned()], 10)));
    sync.refetch().await;

    let state = sync.state();
    assert_eq!(state.status, SyncStatus::Ready);
    assert_eq!(state.cursor.offset, 0);
    assert_eq!(state.total(), 10);
    assert_eq!(state.total_pages(), 1);
    assert!(!state.has_prev());
    assert_eq!(*state.items, vec!["row-0".to_owned()]);
    assert_eq!(sync.query().await.offset, 0);
    let offsets: Vec<u64> = source.calls().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, vec![0, 10, 10, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_first_page_is_a_real_empty_result() {
    let source = FakeSource::new(0);
    source.then(Duration::ZERO, Ok(Page::new(vec![], 0)));
    let sync = CollectionSync::new(source.clone(), SyncOptions::default());
    sync.start().await;

    assert!(sync.state().items.is_empty());
    assert_eq!(source.call_count(), 1);
}

// ── Polling ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_polling_follows_interval_changes() {
    let source = FakeSource::new(3);
    let options = SyncOptions::default().with_refetch_interval(Duration::from_secs(30));
    let sync = CollectionSync::new(source.clone(), options);
    sync.start().await;
    assert_eq!(source.call_count(), 1);
    assert_eq!(sync.refetch_interval(), Some(Duration::from_secs(30)));

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(source.call_count(), 3);

    sync.set_refetch_interval(Duration::ZERO);
    assert_eq!(sync.refetch_interval(), None);
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(source.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_last_handle_stops_polling() {
    let source = FakeSource::new(3);
    let options = SyncOptions::default().with_refetch_interval(Duration::from_secs(10));
    let sync = CollectionSync::new(source.clone(), options);
    sync.start().await;
    drop(sync);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(source.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_resource_polls_and_keeps_value_on_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let resource = ResourceSync::new(
        "counter",
        FnResource::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 2 {
                    Err(server_error())
                } else {
                    Ok(n)
                }
            }
        }),
    );
    assert!(resource.value().is_none());

    resource.start(Duration::from_secs(30)).await;
    assert_eq!(resource.value().as_deref(), Some(&1));

    tokio::time::sleep(Duration::from_secs(31)).await;
    let state = resource.state();
    assert_eq!(state.error().and_then(|e| e.status), Some(500));
    assert_eq!(state.value.as_deref(), Some(&1));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(resource.value().as_deref(), Some(&3));
    assert!(resource.state().status.is_ready());

    resource.shutdown();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
