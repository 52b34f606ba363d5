use colored::Colorize;
use trawl::commands::command_argument_builder;
use trawl::handlers::handle_crawl;
use trawl_core::print_banner;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    init_tracing();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if let Err(e) = handle_crawl(&matches).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

// Logs go to stderr so they never mix with the report on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
