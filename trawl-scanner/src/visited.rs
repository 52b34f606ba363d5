use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// URLs that have already been discovered. Entries are never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// This call inserted the URL.
    Marked,
    AlreadyVisited,
    /// The set is full; the URL was not inserted.
    CapReached,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn urls(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.urls().contains(url)
    }

    /// Test-and-set. Returns `true` only for the call that inserted `url`.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut urls = self.urls();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Like [`VisitedSet::mark_visited`], but refuses new entries once `cap`
    /// URLs are stored. The size check and the insert happen under one lock.
    pub fn mark_within(&self, url: &str, cap: usize) -> MarkOutcome {
        let mut urls = self.urls();
        if urls.contains(url) {
            MarkOutcome::AlreadyVisited
        } else if urls.len() >= cap {
            MarkOutcome::CapReached
        } else {
            urls.insert(url.to_string());
            MarkOutcome::Marked
        }
    }

    pub fn unique_count(&self) -> usize {
        self.urls().len()
    }
}
