pub mod config;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod frontier;
pub mod result;
pub mod visited;

pub use config::{CapPolicy, CrawlConfig};
pub use crawler::{Crawler, Discovery, DiscoveryCallback, ResultCallback};
pub use error::ScanError;
pub use fetcher::{Fetcher, Page};
pub use frontier::Frontier;
pub use result::{CrawlResult, CrawlStatus, CrawlSummary};
pub use visited::{MarkOutcome, VisitedSet};
