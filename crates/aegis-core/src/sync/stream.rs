// ── Reactive sync subscriptions ──

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to the published state of one sync instance.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct SyncStream<V: Clone + Send + Sync + 'static> {
    current: V,
    receiver: watch::Receiver<V>,
}

impl<V: Clone + Send + Sync + 'static> SyncStream<V> {
    pub(crate) fn new(receiver: watch::Receiver<V>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &V {
        &self.current
    }

    /// Latest published state (may be newer than `current()`).
    pub fn latest(&self) -> V {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the sync instance is gone.
    pub async fn changed(&mut self) -> Option<V> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&V) -> bool) -> Option<V> {
        let snap = self.receiver.wait_for(predicate).await.ok()?.clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> SyncWatchStream<V> {
        SyncWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding every published state.
pub struct SyncWatchStream<V: Clone + Send + Sync + 'static> {
    inner: WatchStream<V>,
}

impl<V: Clone + Send + Sync + 'static> Stream for SyncWatchStream<V> {
    type Item = V;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
