use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of processing one URL taken from the frontier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub body_bytes: usize,
    pub response_time: Duration,
    pub links_found: usize,
    pub new_links: usize,
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            status_code: 0,
            content_type: None,
            title: None,
            body_bytes: 0,
            response_time: Duration::from_secs(0),
            links_found: 0,
            new_links: 0,
            error: None,
        }
    }

    pub fn with_error(url: String, status_code: u16, error: String) -> Self {
        Self {
            status_code,
            error: Some(error),
            ..Self::new(url)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    /// The frontier drained; nothing left to crawl.
    Exhausted,
    /// The visited cap was reached.
    CapReached,
    /// The run was cancelled before it finished.
    Cancelled,
}

impl CrawlStatus {
    pub fn description(&self) -> &'static str {
        match self {
            CrawlStatus::Exhausted => "nothing left to crawl",
            CrawlStatus::CapReached => "visited cap reached",
            CrawlStatus::Cancelled => "cancelled",
        }
    }
}

/// Counters and per-page results of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub status: CrawlStatus,
    /// Every URL ever pushed to the frontier, seed included.
    pub total_enqueued: usize,
    /// URLs still waiting in the frontier when the run ended.
    pub pending: usize,
    /// Distinct URLs marked visited. The seed is not counted.
    pub unique_visited: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub started_at: i64,
    pub elapsed: Duration,
    pub results: Vec<CrawlResult>,
}
