use crate::error::{Result, ScanError};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::sync::futures::Notified;

/// FIFO work list of URLs waiting to be fetched.
///
/// Storage and counters live behind one mutex so every mutation updates them
/// together. `in_flight` counts URLs handed out by [`Frontier::claim`] that
/// have not been [`Frontier::complete`]d yet; together with an empty queue it
/// tells workers when the crawl has drained.
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierState>,
    changed: Notify,
}

#[derive(Debug, Default)]
struct FrontierState {
    urls: VecDeque<String>,
    total_enqueued: usize,
    in_flight: usize,
}

/// Result of asking the frontier for work.
#[derive(Debug, PartialEq, Eq)]
pub enum Claim {
    Ready(String),
    /// Queue is empty but other workers may still enqueue.
    Busy,
    /// Queue is empty and nothing is in flight.
    Drained,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FrontierState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a URL and return the running total of URLs ever enqueued.
    pub fn enqueue(&self, url: String) -> usize {
        let total = {
            let mut state = self.state();
            state.urls.push_back(url);
            state.total_enqueued += 1;
            state.total_enqueued
        };
        self.changed.notify_waiters();
        total
    }

    /// Put an abandoned URL back at the head of the queue.
    ///
    /// The URL was already counted when first enqueued, so the total is
    /// left untouched.
    pub fn requeue(&self, url: String) {
        self.state().urls.push_front(url);
        self.changed.notify_waiters();
    }

    pub fn dequeue(&self) -> Result<String> {
        self.state().urls.pop_front().ok_or(ScanError::EmptyFrontier)
    }

    pub fn pending(&self) -> usize {
        self.state().urls.len()
    }

    pub fn total_enqueued(&self) -> usize {
        self.state().total_enqueued
    }

    pub fn is_empty(&self) -> bool {
        self.state().urls.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.state().in_flight
    }

    /// Drop every pending URL. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut state = self.state();
        let dropped = state.urls.len();
        state.urls.clear();
        dropped
    }

    /// Snapshot of the pending URLs in visit order.
    pub fn pending_urls(&self) -> Vec<String> {
        self.state().urls.iter().cloned().collect()
    }

    /// Dequeue and mark in flight as one step.
    pub fn claim(&self) -> Claim {
        let mut state = self.state();
        match state.urls.pop_front() {
            Some(url) => {
                state.in_flight += 1;
                Claim::Ready(url)
            }
            None if state.in_flight > 0 => Claim::Busy,
            None => Claim::Drained,
        }
    }

    /// Finish a URL obtained from [`Frontier::claim`].
    pub fn complete(&self) {
        {
            let mut state = self.state();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.changed.notify_waiters();
    }

    /// Resolves after the next enqueue or completion.
    ///
    /// Call `enable()` on the pinned future before [`Frontier::claim`] so a
    /// wakeup between the claim and the await is not lost.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }
}
