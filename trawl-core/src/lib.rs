pub mod crawl;
pub mod report;

use colored::Colorize;

pub use crawl::{CrawlError, CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use report::ReportFormat;

const BANNER: &str = r#"
  _                            _
 | |_ _ __ __ ___      __    | |
 | __| '__/ _` \ \ /\ / /    | |
 | |_| | | (_| |\ V  V /     |_|
  \__|_|  \__,_| \_/\_/      (_)
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} v{}\n",
        "breadth-first web crawler".bright_white(),
        env!("CARGO_PKG_VERSION")
    );
}
