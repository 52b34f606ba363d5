use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use trawl_core::crawl::{CrawlOptions, execute_crawl};
use trawl_core::report::{ReportFormat, generate_report, generate_summary, save_report};
use trawl_scanner::{CapPolicy, CrawlSummary};
use trawl_scanner::crawler::validate_seed;

/// Trim and validate a seed URL typed by the user.
pub fn parse_seed_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("No URL given".to_string());
    }
    validate_seed(trimmed).map_err(|e| e.to_string())
}

/// Ask for the seed URL on `writer` and read one line from `reader`.
pub fn prompt_for_seed<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<String, String> {
    writeln!(writer, "Enter the url to crawl: ").map_err(|e| format!("Can't prompt for the url: {}", e))?;
    writer.flush().map_err(|e| format!("Can't prompt for the url: {}", e))?;

    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| format!("Can't get the url: {}", e))?;
    if read == 0 {
        return Err("Can't get the url: end of input".to_string());
    }

    parse_seed_url(&line)
}

/// Expand `~` in a user supplied output path.
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Map parsed arguments onto crawl options for `seed`.
pub fn build_crawl_options(args: &ArgMatches, seed: String) -> CrawlOptions {
    let mut options = CrawlOptions::new(seed);

    if let Some(threads) = args.get_one::<usize>("threads") {
        options.threads = *threads;
    }
    if let Some(max_visited) = args.get_one::<usize>("max-visited") {
        options.max_visited = *max_visited;
    }
    if let Some(max_body_bytes) = args.get_one::<usize>("max-body-bytes") {
        options.max_body_bytes = *max_body_bytes;
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    if let Some(policy) = args.get_one::<CapPolicy>("on-cap") {
        options.cap_policy = *policy;
    }

    options.show_progress_bars = !args.get_flag("quiet") && !args.get_flag("no-progress");
    options
}

/// Render `summary` without terminal colours and write it to `path`.
///
/// Colouring is switched back on whether or not the write succeeds.
pub fn write_report_file(summary: &CrawlSummary, format: ReportFormat, path: &Path) -> Result<()> {
    colored::control::set_override(false);
    let written = generate_report(summary, format)
        .context("Failed to render report")
        .and_then(|report| {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))
        });
    colored::control::unset_override();
    written
}

pub async fn handle_crawl(args: &ArgMatches) -> Result<()> {
    let quiet = args.get_flag("quiet");

    let seed = match args.get_one::<String>("URL") {
        Some(url) => parse_seed_url(url),
        None => {
            let stdin = io::stdin();
            prompt_for_seed(&mut stdin.lock(), &mut io::stdout())
        }
    }
    .map_err(|e| anyhow!(e))?;

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<String>("output").map(|p| resolve_output_path(p));

    let options = build_crawl_options(args, seed);

    if !quiet {
        println!("\n🕷️  Crawling {}", options.seed.bright_white());
        println!("Workers: {}", options.threads);
        println!("Visited cap: {} ({} on cap)", options.max_visited, options.cap_policy.as_str());
        println!("Body limit: {} bytes\n", options.max_body_bytes);
    }

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping crawl");
            ctrl_c_token.cancel();
        }
    });

    let progress_callback = (!quiet).then(|| {
        Arc::new(|line: String| {
            println!("{}", line);
        }) as trawl_core::CrawlProgressCallback
    });

    let summary = execute_crawl(options, progress_callback, cancel).await?;

    println!("\n");
    print!("{}", generate_summary(&summary));

    match output {
        Some(path) => {
            write_report_file(&summary, format, &path)?;
            println!("{} Report saved to {}", "✓".green().bold(), path.display());
        }
        None if format != ReportFormat::Text => {
            println!("{}", generate_report(&summary, format)?);
        }
        None => {}
    }

    Ok(())
}
