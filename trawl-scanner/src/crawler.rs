use crate::config::{CapPolicy, CrawlConfig};
use crate::error::{Result, ScanError};
use crate::extractor;
use crate::fetcher::{Fetcher, Page};
use crate::frontier::{Claim, Frontier};
use crate::result::{CrawlResult, CrawlStatus, CrawlSummary};
use crate::visited::{MarkOutcome, VisitedSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// A URL seen for the first time during the run.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub worker_id: usize,
    pub url: String,
    pub source_url: String,
    pub source_title: String,
    pub total_enqueued: usize,
}

pub type DiscoveryCallback = Arc<dyn Fn(Discovery) + Send + Sync>;
pub type ResultCallback = Arc<dyn Fn(CrawlResult) + Send + Sync>;

/// Check that `seed` is an absolute http(s) URL with a host.
///
/// The string itself is returned untouched; URLs are never normalized.
pub fn validate_seed(seed: &str) -> Result<String> {
    let parsed =
        Url::parse(seed).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            seed,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ScanError::InvalidUrl(format!("{}: missing host", seed)));
    }

    Ok(seed.to_string())
}

/// Shared state of one run. Dropped when the run ends.
#[derive(Default)]
struct RunState {
    frontier: Frontier,
    visited: VisitedSet,
    results: Mutex<Vec<CrawlResult>>,
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
}

pub struct Crawler {
    fetcher: Fetcher,
    config: CrawlConfig,
    discovery_callback: Option<DiscoveryCallback>,
    result_callback: Option<ResultCallback>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlConfig::default())
    }

    pub fn with_config(config: CrawlConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self {
            fetcher,
            config,
            discovery_callback: None,
            result_callback: None,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn with_discovery_callback(mut self, callback: DiscoveryCallback) -> Self {
        self.discovery_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlSummary> {
        self.crawl_with_cancellation(seed, CancellationToken::new())
            .await
    }

    /// Crawl breadth-first from `seed` until the frontier drains, the visited
    /// cap is hit, or `cancel` fires.
    ///
    /// Only an invalid seed (or a panicking worker) is an error. Failed pages
    /// are recorded in the summary and skipped.
    pub async fn crawl_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlSummary> {
        let seed = validate_seed(seed)?;
        let workers = self.config.workers.max(1);
        let max_visited = self.config.max_visited;

        info!(
            "Starting crawl of {} with {} workers (cap {})",
            seed, workers, max_visited
        );

        let started_at = chrono::Utc::now().timestamp();
        let start = Instant::now();

        let state = Arc::new(RunState::default());
        state.frontier.enqueue(seed.clone());

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    fetcher: self.fetcher.clone(),
                    state: state.clone(),
                    max_visited,
                    cancel: cancel.clone(),
                    discovery_callback: self.discovery_callback.clone(),
                    result_callback: self.result_callback.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        futures::future::try_join_all(handles).await?;

        let unique_visited = state.visited.unique_count();
        let status = if cancel.is_cancelled() {
            CrawlStatus::Cancelled
        } else if unique_visited >= max_visited {
            CrawlStatus::CapReached
        } else {
            CrawlStatus::Exhausted
        };

        if status == CrawlStatus::CapReached && self.config.cap_policy == CapPolicy::Drop {
            let dropped = state.frontier.clear();
            debug!("Dropped {} queued URLs after reaching the cap", dropped);
        }

        let results = std::mem::take(&mut *state.results.lock().await);
        let summary = CrawlSummary {
            seed,
            status,
            total_enqueued: state.frontier.total_enqueued(),
            pending: state.frontier.pending(),
            unique_visited,
            pages_fetched: state.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: state.fetch_failures.load(Ordering::Relaxed),
            started_at,
            elapsed: start.elapsed(),
            results,
        };

        info!(
            "Crawl complete ({}). Queued {}, pending {}, visited {}",
            status.description(),
            summary.total_enqueued,
            summary.pending,
            summary.unique_visited
        );

        Ok(summary)
    }
}

struct Worker {
    id: usize,
    fetcher: Fetcher,
    state: Arc<RunState>,
    max_visited: usize,
    cancel: CancellationToken,
    discovery_callback: Option<DiscoveryCallback>,
    result_callback: Option<ResultCallback>,
}

impl Worker {
    async fn run(self) {
        debug!("Worker {} started", self.id);

        loop {
            if self.cancel.is_cancelled() {
                debug!("Worker {} cancelled", self.id);
                break;
            }

            if self.state.visited.unique_count() >= self.max_visited {
                debug!("Worker {} stopping at visited cap", self.id);
                break;
            }

            // Armed before claiming so a completion in between still wakes us.
            let changed = self.state.frontier.changed();
            tokio::pin!(changed);
            changed.as_mut().enable();

            let url = match self.state.frontier.claim() {
                Claim::Ready(url) => url,
                Claim::Busy => {
                    tokio::select! {
                        _ = changed.as_mut() => continue,
                        _ = self.cancel.cancelled() => break,
                    }
                }
                Claim::Drained => break,
            };

            self.visit(url).await;
            self.state.frontier.complete();
        }

        debug!("Worker {} finished", self.id);
    }

    async fn visit(&self, url: String) {
        let started = Instant::now();

        let fetched = tokio::select! {
            fetched = self.fetcher.fetch(&url) => fetched,
            _ = self.cancel.cancelled() => {
                debug!("Worker {} abandoned {} on cancellation", self.id, url);
                self.state.frontier.requeue(url);
                return;
            }
        };

        let result = match fetched {
            Ok(page) => self.process_page(page, started.elapsed()),
            Err(e) => {
                warn!("Crawl error for {}: {}", url, e);
                self.state.fetch_failures.fetch_add(1, Ordering::Relaxed);
                let mut result =
                    CrawlResult::with_error(url, e.status_code().unwrap_or(0), e.to_string());
                result.response_time = started.elapsed();
                result
            }
        };

        if let Some(ref callback) = self.result_callback {
            callback(result.clone());
        }

        self.state.results.lock().await.push(result);
    }

    /// Extract links from a fetched page and queue the ones never seen before.
    fn process_page(&self, page: Page, response_time: Duration) -> CrawlResult {
        self.state.pages_fetched.fetch_add(1, Ordering::Relaxed);

        let title = extractor::extract_title(&page.body);
        let links = extractor::extract_links(&page.body);

        let mut result = CrawlResult::new(page.url.clone());
        result.status_code = page.status;
        result.content_type = page.content_type;
        result.body_bytes = page.body.len();
        result.response_time = response_time;
        result.links_found = links.len();
        result.title = (!title.is_empty()).then(|| title.clone());

        for link in links {
            match self.state.visited.mark_within(&link, self.max_visited) {
                MarkOutcome::Marked => {
                    let total_enqueued = self.state.frontier.enqueue(link.clone());
                    result.new_links += 1;

                    info!("Count: {} | {} -> {}", total_enqueued, link, title);

                    if let Some(ref callback) = self.discovery_callback {
                        callback(Discovery {
                            worker_id: self.id,
                            url: link,
                            source_url: page.url.clone(),
                            source_title: title.clone(),
                            total_enqueued,
                        });
                    }
                }
                MarkOutcome::AlreadyVisited => {}
                MarkOutcome::CapReached => {
                    debug!("Visited cap reached while processing {}", page.url);
                    break;
                }
            }
        }

        result
    }
}
