pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{build_crawl_options, parse_seed_url, prompt_for_seed, resolve_output_path};

// Re-export crawl functionality from trawl-core
pub use trawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
