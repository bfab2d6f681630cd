//! Snapshot of the all-funds directory with its refresh time.
//!
//! The cache holds no locks and performs no I/O: callers ask [`DirectoryCache::is_stale`] and,
//! after fetching, hand the new entries to [`DirectoryCache::replace`].

use crate::core::fund::DirectoryEntry;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct DirectoryCache {
    entries: Vec<DirectoryEntry>,
    last_refreshed: Option<DateTime<Utc>>,
    ttl: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub results: Vec<DirectoryEntry>,
    pub total: usize,
    pub has_more: bool,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            has_more: false,
        }
    }
}

impl DirectoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            last_refreshed: None,
            ttl,
        }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Empty, never refreshed, or older than the TTL.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        if self.entries.is_empty() {
            return true;
        }
        self.last_refreshed.is_none_or(|at| now - at > self.ttl)
    }

    pub fn replace(&mut self, entries: Vec<DirectoryEntry>, now: DateTime<Utc>) {
        self.entries = entries;
        self.last_refreshed = Some(now);
    }

    /// Case-insensitive substring search on scheme names, paginated by `offset`/`limit`.
    pub fn search(&self, query: &str, limit: usize, offset: usize) -> SearchPage {
        if query.chars().count() < MIN_QUERY_LEN {
            return SearchPage::empty();
        }

        let needle = query.to_lowercase();
        let matching: Vec<&DirectoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.scheme_name.to_lowercase().contains(&needle))
            .collect();

        let total = matching.len();
        SearchPage {
            results: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            total,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}
