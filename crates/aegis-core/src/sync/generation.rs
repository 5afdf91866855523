use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter of one sync instance.
///
/// Every fetch takes a fresh generation; a response is applied only while
/// its generation is still the latest one issued.
#[derive(Debug, Default)]
pub struct RequestGeneration(AtomicU64);

impl RequestGeneration {
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_issue_supersedes() {
        let g = RequestGeneration::default();
        let first = g.issue();
        assert!(g.is_current(first));
        let second = g.issue();
        assert!(second > first);
        assert!(!g.is_current(first));
        assert!(g.is_current(second));
    }
}
