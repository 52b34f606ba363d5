// Tests for crawl orchestration

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use trawl_core::crawl::{CrawlError, CrawlOptions, execute_crawl, extract_url_path};
use trawl_scanner::{CapPolicy, CrawlStatus};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/api/v1/users"), "/api/v1/users");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// execute_crawl Tests
// ============================================================================

async fn mount(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(body.into_bytes()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_execute_crawl_reports_discoveries() {
    let server = MockServer::start().await;
    let uri = server.uri();
    mount(
        &server,
        "/",
        format!("<title>Home</title> {uri}/one {uri}/two {uri}/one"),
    )
    .await;
    mount(&server, "/one", String::new()).await;
    mount(&server, "/two", String::new()).await;

    let lines = Arc::new(Mutex::new(Vec::new()));
    let lines_clone = lines.clone();
    let callback = Arc::new(move |line: String| lines_clone.lock().unwrap().push(line));

    let summary = execute_crawl(
        CrawlOptions::new(format!("{}/", uri)),
        Some(callback),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(summary.status, CrawlStatus::Exhausted);
    assert_eq!(summary.unique_visited, 2);

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            format!("Count: 2 | {}/one -> Home", uri),
            format!("Count: 3 | {}/two -> Home", uri),
        ]
    );
}

#[tokio::test]
async fn test_execute_crawl_cap_policy() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let body: String = (0..5).map(|i| format!("{}/l{} ", uri, i)).collect();
    mount(&server, "/", body).await;

    let mut options = CrawlOptions::new(format!("{}/", uri));
    options.max_visited = 2;
    options.cap_policy = CapPolicy::Drop;

    let summary = execute_crawl(options, None, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.status, CrawlStatus::CapReached);
    assert_eq!(summary.unique_visited, 2);
    assert_eq!(summary.pending, 0);
}

#[tokio::test]
async fn test_execute_crawl_invalid_seed() {
    let result = execute_crawl(
        CrawlOptions::new("not a url"),
        None,
        CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(CrawlError::InvalidSeed(_))));
}
