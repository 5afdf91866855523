// ── Offset pagination ──

use serde::{Deserialize, Serialize};

/// Position inside an offset/limit paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub offset: u64,
    pub limit: u32,
    /// Total size of the collection, as last reported by the server.
    pub total: u64,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total: 0,
        }
    }

    fn step(&self) -> u64 {
        u64::from(self.limit.max(1))
    }

    /// `ceil(total / limit)`; an empty collection has zero pages.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.step())
    }

    /// Zero-based index of the current page.
    pub fn page_index(&self) -> u64 {
        self.offset / self.step()
    }

    /// One-based page number, for display and page-numbered endpoints.
    pub fn page_number(&self) -> u64 {
        self.page_index() + 1
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.step() < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    /// Offset of the zero-based page `index`, clamped to the last page.
    pub fn offset_for_page(&self, index: u64) -> u64 {
        let last = self.total_pages().saturating_sub(1);
        index.min(last) * self.step()
    }

    pub fn next(&self) -> Option<Self> {
        self.has_next().then(|| Self {
            offset: self.offset + self.step(),
            ..*self
        })
    }

    pub fn prev(&self) -> Option<Self> {
        self.has_prev().then(|| Self {
            offset: self.offset.saturating_sub(self.step()),
            ..*self
        })
    }

    pub fn at_page(&self, index: u64) -> Self {
        Self {
            offset: self.offset_for_page(index),
            ..*self
        }
    }

    /// Adopt a new server total, pulling the offset back inside the
    /// collection if it shrank.
    pub fn with_total(&self, total: u64) -> Self {
        let mut next = Self { total, ..*self };
        if next.offset >= total {
            next.offset = next.offset_for_page(next.total_pages());
        }
        next
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(10)
    }
}
