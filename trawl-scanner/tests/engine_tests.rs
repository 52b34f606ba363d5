use std::sync::{Arc, Mutex};
use std::time::Duration;
use trawl_scanner::frontier::Claim;
use trawl_scanner::{CapPolicy, CrawlConfig, CrawlStatus, Crawler, Discovery, Frontier, VisitedSet};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// A three level tree: / -> /n{i} -> /n{i}/leaf{j}
async fn mount_tree(server: &MockServer, width: usize) {
    let uri = server.uri();
    let root: String = (0..width)
        .map(|i| format!("<a href=\"{uri}/n{i}\">n{i}</a>\n"))
        .collect();
    mount_html(server, "/", format!("<title>Root</title>{root}")).await;

    for i in 0..width {
        let children: String = (0..width)
            .map(|j| format!("<a href=\"{uri}/n{i}/leaf{j}\">leaf</a> <a href=\"{uri}/\">up</a>\n"))
            .collect();
        mount_html(server, &format!("/n{i}"), format!("<title>N{i}</title>{children}")).await;
        for j in 0..width {
            mount_html(server, &format!("/n{i}/leaf{j}"), "<title>Leaf</title>".to_string()).await;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_crawl_visits_every_page_once() {
    let server = MockServer::start().await;
    mount_tree(&server, 4).await;

    let discovered = Arc::new(Mutex::new(Vec::new()));
    let discovered_clone = discovered.clone();

    let crawler = Crawler::with_config(
        CrawlConfig::default()
            .with_workers(6)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
    .with_discovery_callback(Arc::new(move |d: Discovery| {
        discovered_clone.lock().unwrap().push(d.url);
    }));

    let summary = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    // 4 inner nodes, 16 leaves and the seed rediscovered through "up" links.
    assert_eq!(summary.status, CrawlStatus::Exhausted);
    assert_eq!(summary.unique_visited, 21);
    assert_eq!(summary.total_enqueued, 22);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.results.len(), 22);

    let mut urls = discovered.lock().unwrap().clone();
    let count = urls.len();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), count);
    assert_eq!(count, 21);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_crawl_respects_cap_with_drop_policy() {
    let server = MockServer::start().await;
    mount_tree(&server, 4).await;

    let crawler = Crawler::with_config(
        CrawlConfig::default()
            .with_workers(4)
            .with_max_visited(5)
            .with_cap_policy(CapPolicy::Drop)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let summary = crawler.crawl(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(summary.status, CrawlStatus::CapReached);
    assert_eq!(summary.unique_visited, 5);
    assert_eq!(summary.total_enqueued, 6);
    assert_eq!(summary.pending, 0);
}

#[test]
fn test_frontier_and_visited_drive_a_manual_loop() {
    let frontier = Frontier::new();
    let visited = VisitedSet::new();

    frontier.enqueue("http://a.test/".to_string());
    let mut order = Vec::new();

    loop {
        let url = match frontier.claim() {
            Claim::Ready(url) => url,
            Claim::Busy => unreachable!("single caller never sees in-flight work"),
            Claim::Drained => break,
        };
        if url == "http://a.test/" {
            for link in ["http://b.test/x", "http://c.test/y", "http://b.test/x"] {
                if visited.mark_visited(link) {
                    frontier.enqueue(link.to_string());
                }
            }
        }
        order.push(url);
        frontier.complete();
    }

    assert_eq!(order, vec!["http://a.test/", "http://b.test/x", "http://c.test/y"]);
    assert_eq!(visited.unique_count(), 2);
    assert_eq!(frontier.total_enqueued(), 3);
    assert!(frontier.is_empty());
}
