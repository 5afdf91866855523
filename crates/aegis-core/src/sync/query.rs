use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumString};

/// Categorical filters a collection endpoint may accept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Filter {
    Role,
    Status,
    UnitId,
    ProductId,
}

/// Parameters of the next collection request.
///
/// Any change other than page navigation puts the query back on the first
/// page, so a narrowed collection is never read at a stale offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: u64,
    pub limit: u32,
    pub search: Option<String>,
    filters: BTreeMap<Filter, String>,
}

/// `"all"` and blank values mean "no filter".
fn meaningful(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_owned)
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    pub fn filter(&self, filter: Filter) -> Option<&str> {
        self.filters.get(&filter).map(String::as_str)
    }

    pub fn filters(&self) -> impl Iterator<Item = (Filter, &str)> {
        self.filters.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Returns whether the query changed.
    pub fn set_filter(&mut self, filter: Filter, value: Option<&str>) -> bool {
        let next = meaningful(value);
        if self.filters.get(&filter) == next.as_ref() {
            return false;
        }
        match next {
            Some(v) => self.filters.insert(filter, v),
            None => self.filters.remove(&filter),
        };
        self.offset = 0;
        true
    }

    /// Returns whether the query changed.
    pub fn set_search(&mut self, value: Option<&str>) -> bool {
        let next = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        if self.search == next {
            return false;
        }
        self.search = next;
        self.offset = 0;
        true
    }

    /// Returns whether the query changed.
    pub fn set_limit(&mut self, limit: u32) -> bool {
        let limit = limit.max(1);
        if self.limit == limit {
            return false;
        }
        self.limit = limit;
        self.offset = 0;
        true
    }

    /// One-based page number of the current offset.
    pub fn page_number(&self) -> u64 {
        self.offset / u64::from(self.limit.max(1)) + 1
    }

    pub fn with_filter(mut self, filter: Filter, value: &str) -> Self {
        self.set_filter(filter, Some(value));
        self
    }
}
