// Report generation from a finished crawl

use crate::crawl::extract_url_path;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use trawl_scanner::{CrawlResult, CrawlStatus, CrawlSummary};
use url::Url;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// End-of-run counters in the classic stats block layout.
pub fn generate_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    out.push_str("------------Crawler Stats------------\n");
    out.push_str(&format!(">> Total queued: {}\n", summary.total_enqueued));
    out.push_str(&format!(">> To be crawled (Queue): {}\n", summary.pending));
    out.push_str(&format!(">> Crawled: {}\n", summary.unique_visited));
    out.push_str(&format!(">> Stopped: {}\n", summary.status.description()));
    out
}

pub fn generate_report(
    summary: &CrawlSummary,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary)),
        ReportFormat::Json => generate_json_report(summary),
        ReportFormat::Csv => Ok(generate_csv_report(summary)),
        ReportFormat::Markdown => Ok(generate_markdown_report(summary)),
    }
}

pub fn generate_text_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("\n                            TRAWL CRAWL REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Seed:         {}\n", summary.seed));
    report.push_str(&format!("Status:       {}\n", status_label(summary.status)));
    report.push_str(&format!("Started:      {}\n", format_timestamp(summary.started_at)));
    report.push_str(&format!(
        "Duration:     {:.2} seconds\n",
        summary.elapsed.as_secs_f64()
    ));
    report.push_str(&format!("Pages:        {} fetched, {} failed\n\n", summary.pages_fetched, summary.fetch_failures));

    report.push_str(&generate_summary(summary));
    report.push('\n');

    if !summary.results.is_empty() {
        report.push_str(RULE);
        report.push_str("\nPAGES VISITED\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        for (host, host_results) in group_by_host(&summary.results) {
            report.push_str(&format!("## {}\n", host));
            report.push_str(&format!("  {} pages\n\n", host_results.len()));

            for result in host_results {
                let mut line = format!(
                    "  {} {}",
                    colorize_status(result.status_code),
                    extract_url_path(&result.url)
                );
                if let Some(ref title) = result.title {
                    line.push_str(&format!(" {}", format!("\"{}\"", title).dimmed()));
                }
                if result.new_links > 0 {
                    line.push_str(&format!(" (+{} new)", result.new_links));
                }
                if let Some(ref error) = result.error {
                    line.push_str(&format!(" {}", error.red()));
                }
                report.push_str(&line);
                report.push('\n');
            }
            report.push('\n');
        }
    }

    report.push_str(RULE);
    report.push_str("\n                              End of Report\n");
    report.push_str(RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(summary: &CrawlSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Trawl",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "seed": summary.seed,
                "status": summary.status,
                "started_at": format_iso8601_timestamp(summary.started_at),
                "duration_seconds": summary.elapsed.as_secs_f64(),
            },
            "summary": {
                "total_enqueued": summary.total_enqueued,
                "pending": summary.pending,
                "unique_visited": summary.unique_visited,
                "pages_fetched": summary.pages_fetched,
                "fetch_failures": summary.fetch_failures
            },
            "pages": summary.results.iter().map(|r| serde_json::json!({
                "url": r.url,
                "status_code": r.status_code,
                "content_type": r.content_type,
                "title": r.title,
                "body_bytes": r.body_bytes,
                "response_time_ms": r.response_time.as_millis() as u64,
                "links_found": r.links_found,
                "new_links": r.new_links,
                "error": r.error,
            })).collect::<Vec<_>>()
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(summary: &CrawlSummary) -> String {
    let mut csv = String::from(
        "url,status_code,title,body_bytes,response_time_ms,links_found,new_links,error\n",
    );

    for result in &summary.results {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            escape_csv(&result.url),
            result.status_code,
            escape_csv(result.title.as_deref().unwrap_or("")),
            result.body_bytes,
            result.response_time.as_millis(),
            result.links_found,
            result.new_links,
            escape_csv(result.error.as_deref().unwrap_or("")),
        ));
    }

    csv
}

pub fn generate_markdown_report(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Trawl Crawl Report\n\n");
    md.push_str(&format!("- **Seed:** {}\n", summary.seed));
    md.push_str(&format!("- **Status:** {}\n", status_label(summary.status)));
    md.push_str(&format!("- **Started:** {}\n", format_timestamp(summary.started_at)));
    md.push_str(&format!(
        "- **Duration:** {:.2} seconds\n\n",
        summary.elapsed.as_secs_f64()
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Counter | Value |\n|---|---|\n");
    md.push_str(&format!("| Total queued | {} |\n", summary.total_enqueued));
    md.push_str(&format!("| To be crawled (queue) | {} |\n", summary.pending));
    md.push_str(&format!("| Crawled | {} |\n", summary.unique_visited));
    md.push_str(&format!("| Pages fetched | {} |\n", summary.pages_fetched));
    md.push_str(&format!("| Fetch failures | {} |\n\n", summary.fetch_failures));

    if !summary.results.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Status | URL | Title | New links |\n|---|---|---|---|\n");
        for result in &summary.results {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                result.status_code,
                result.url,
                result.title.as_deref().unwrap_or("").replace('|', "\\|"),
                result.new_links
            ));
        }
        md.push('\n');
    }

    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

// Helper functions

fn status_label(status: CrawlStatus) -> &'static str {
    match status {
        CrawlStatus::Exhausted => "Completed (nothing left to crawl)",
        CrawlStatus::CapReached => "Completed (visited cap reached)",
        CrawlStatus::Cancelled => "Cancelled",
    }
}

fn colorize_status(status_code: u16) -> String {
    let code = status_code.to_string();
    match status_code {
        100..=199 => code.white().to_string(),
        200..=299 => code.green().to_string(),
        300..=399 => code.cyan().to_string(),
        400..=499 => code.yellow().to_string(),
        500..=599 => code.red().to_string(),
        _ => "ERR".red().to_string(),
    }
}

/// Results keyed by host, hosts sorted, visit order kept within a host.
fn group_by_host(results: &[CrawlResult]) -> BTreeMap<String, Vec<&CrawlResult>> {
    let mut by_host: BTreeMap<String, Vec<&CrawlResult>> = BTreeMap::new();
    for result in results {
        let host = Url::parse(&result.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push(result);
    }
    by_host
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_iso8601_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_colorize_status_zero() {
        colored::control::set_override(false);
        assert_eq!(colorize_status(0), "ERR");
        assert_eq!(colorize_status(200), "200");
    }
}
