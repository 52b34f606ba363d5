use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// A fetched response. Only lives for the duration of one crawl step.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Issues bounded GET requests.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// GET `url` and read at most `max_body_bytes` of its body.
    ///
    /// A non-2xx answer is reported as [`ScanError::HttpStatus`] without
    /// reading the body. The response is dropped, and its connection
    /// released, on every return path.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("Fetching {}", url);

        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let limit = self.max_body_bytes;
        let declared = response.content_length().unwrap_or(0) as usize;
        let mut body = Vec::with_capacity(declared.min(limit));

        while body.len() < limit {
            let Some(chunk) = response.chunk().await? else {
                break;
            };
            let take = chunk.len().min(limit - body.len());
            body.extend_from_slice(&chunk[..take]);
        }

        debug!("Read {} bytes from {}", body.len(), url);

        Ok(Page {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
