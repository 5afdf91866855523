// ── Polling lifecycle ──
//
// At most one periodic timer per sync instance. Re-arming with a new
// period tears the old timer down first; a zero period leaves none.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub(crate) struct Poller {
    parent: CancellationToken,
    active: Mutex<Option<(Duration, CancellationToken)>>,
}

impl Poller {
    pub(crate) fn new(parent: CancellationToken) -> Self {
        Self {
            parent,
            active: Mutex::new(None),
        }
    }

    pub(crate) fn period(&self) -> Option<Duration> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(period, _)| *period)
    }

    /// Install a timer calling `tick` every `period`. `tick` returning
    /// `false` ends the timer. Must be called inside a Tokio runtime.
    pub(crate) fn arm<F, Fut>(&self, period: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.as_ref().is_some_and(|(p, _)| *p == period) {
            return;
        }
        if let Some((old, token)) = active.take() {
            debug!(period_ms = old.as_millis(), "stopping poll timer");
            token.cancel();
        }
        if period.is_zero() {
            return;
        }
        debug!(period_ms = period.as_millis(), "starting poll timer");
        let token = self.parent.child_token();
        tokio::spawn(poll_task(period, token.clone(), tick));
        *active = Some((period, token));
    }

    pub(crate) fn disarm(&self) {
        if let Some((_, token)) = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.disarm();
    }
}

async fn poll_task<F, Fut>(period: Duration, cancel: CancellationToken, tick: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !tick().await {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counting(counter: &Arc<AtomicU32>) -> impl Fn() -> std::future::Ready<bool> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(true)
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_after_each_period() {
        let poller = Poller::new(CancellationToken::new());
        let ticks = Arc::new(AtomicU32::new(0));
        poller.arm(Duration::from_secs(30), counting(&ticks));
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn period_change_replaces_timer() {
        let poller = Poller::new(CancellationToken::new());
        let slow = Arc::new(AtomicU32::new(0));
        let fast = Arc::new(AtomicU32::new(0));
        poller.arm(Duration::from_secs(60), counting(&slow));
        settle().await;
        poller.arm(Duration::from_secs(10), counting(&fast));
        settle().await;
        assert_eq!(poller.period(), Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(61)).await;
        settle().await;
        assert_eq!(slow.load(Ordering::SeqCst), 0);
        assert!(fast.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_and_drop_stop_polling() {
        let ticks = Arc::new(AtomicU32::new(0));
        let poller = Poller::new(CancellationToken::new());
        poller.arm(Duration::from_secs(5), counting(&ticks));
        poller.arm(Duration::ZERO, counting(&ticks));
        assert_eq!(poller.period(), None);

        let dropped = Poller::new(CancellationToken::new());
        dropped.arm(Duration::from_secs(5), counting(&ticks));
        drop(dropped);

        tokio::time::advance(Duration::from_secs(20)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
