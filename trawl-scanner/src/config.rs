use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Stop after this many unique URLs have been discovered.
pub const DEFAULT_MAX_VISITED: usize = 500;
/// Bytes read from a single response body before the rest is discarded.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 1;

/// What happens to queued-but-unvisited URLs once the visited cap stops the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPolicy {
    /// Leave them in the frontier; they are reported as pending.
    #[default]
    Retain,
    /// Clear the frontier; pending is reported as zero.
    Drop,
}

impl FromStr for CapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retain" | "keep" => Ok(CapPolicy::Retain),
            "drop" => Ok(CapPolicy::Drop),
            other => Err(format!("unknown cap policy '{}' (expected retain or drop)", other)),
        }
    }
}

impl CapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapPolicy::Retain => "retain",
            CapPolicy::Drop => "drop",
        }
    }
}

/// Tuning knobs for a single crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_visited: usize,
    pub max_body_bytes: usize,
    pub timeout: Duration,
    pub workers: usize,
    pub cap_policy: CapPolicy,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn with_max_visited(mut self, max_visited: usize) -> Self {
        self.max_visited = max_visited;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Worker count is clamped to at least one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_cap_policy(mut self, cap_policy: CapPolicy) -> Self {
        self.cap_policy = cap_policy;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_visited: DEFAULT_MAX_VISITED,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
            cap_policy: CapPolicy::default(),
            user_agent: format!(
                "trawl/{} (https://github.com/trapdoorsec/trawl)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}
