use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use trawl_scanner::config::{
    CapPolicy, CrawlConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_VISITED, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WORKERS,
};
use trawl_scanner::{CrawlSummary, Crawler, Discovery, ScanError};
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed: String,
    pub threads: usize,
    pub max_visited: usize,
    pub max_body_bytes: usize,
    pub timeout_secs: u64,
    pub cap_policy: CapPolicy,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            threads: DEFAULT_WORKERS,
            max_visited: DEFAULT_MAX_VISITED,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cap_policy: CapPolicy::default(),
            show_progress_bars: false,
        }
    }

    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_workers(self.threads)
            .with_max_visited(self.max_visited)
            .with_max_body_bytes(self.max_body_bytes)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_cap_policy(self.cap_policy)
    }
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for CrawlError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::InvalidUrl(msg) => CrawlError::InvalidSeed(msg),
            other => CrawlError::Scan(other),
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// The per-discovery progress line.
pub fn format_discovery(discovery: &Discovery) -> String {
    format!(
        "Count: {} | {} -> {}",
        discovery.total_enqueued, discovery.url, discovery.source_title
    )
}

/// Execute a crawl with the given options
///
/// Every newly discovered URL is reported through `progress_callback` as a
/// [`format_discovery`] line. With `show_progress_bars` a spinner tracks the
/// running totals and the lines are printed above it.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
    cancel: CancellationToken,
) -> Result<CrawlSummary, CrawlError> {
    let config = options.to_config();
    debug!("Crawl configuration: {:?}", config);

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let pb_clone = progress_bar.clone();
    let discovery_callback = Arc::new(move |discovery: Discovery| {
        let line = format_discovery(&discovery);
        match (&pb_clone, &progress_callback) {
            (Some(pb), Some(callback)) => {
                pb.suspend(|| callback(line));
                pb.set_message(format!("Crawling... {} URLs queued", discovery.total_enqueued));
            }
            (Some(pb), None) => {
                pb.set_message(format!("Crawling... {} URLs queued", discovery.total_enqueued));
            }
            (None, Some(callback)) => callback(line),
            (None, None) => {}
        }
    });

    let pb_clone = progress_bar.clone();
    let count_clone = processed_count.clone();
    let result_callback = Arc::new(move |_result: trawl_scanner::CrawlResult| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Crawling... {} pages processed", count));
            pb.tick();
        }
    });

    let crawler = Crawler::with_config(config)?
        .with_discovery_callback(discovery_callback)
        .with_result_callback(result_callback);

    let outcome = crawler
        .crawl_with_cancellation(&options.seed, cancel)
        .await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    debug!(
        "Processed {} pages",
        processed_count.load(Ordering::Relaxed)
    );

    Ok(outcome?)
}
