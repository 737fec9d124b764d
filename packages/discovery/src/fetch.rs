//! Outbound page fetching.
//!
//! One trait covers both uses of plain HTTP GET in the system: the
//! extractor's reachability probe + body fetch, and the link-health
//! sweep's liveness probe. Implementations carry a bounded per-request
//! timeout so one unresponsive page cannot stall a whole run.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{FetchError, FetchResult};

/// A fetched page: final status plus body text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Plain HTTP GET access to arbitrary job-posting URLs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue a GET and report only the response status.
    ///
    /// An `Err` means the request itself failed (transport, timeout),
    /// which callers treat differently from an error status.
    async fn probe(&self, url: &str) -> FetchResult<u16>;

    /// Issue a GET and return status plus body text.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;
}

/// Reqwest-backed fetcher with a bounded timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a fetcher with a 20s request timeout.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: "KerjaRadarBot/1.0".to_string(),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn get(&self, url: &str) -> FetchResult<reqwest::Response> {
        // Reject malformed links up front; stored links come from an
        // external search index and are not guaranteed well-formed.
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, "HTTP fetch starting");
        self.client
            .get(parsed)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn probe(&self, url: &str) -> FetchResult<u16> {
        let response = self.get(url).await?;
        Ok(response.status().as_u16())
    }

    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        let response = self.get(url).await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage { status, body })
    }
}

/// What the mock fetcher serves for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A page with this status and body.
    Page(u16, String),

    /// The request itself fails (simulated network error).
    Unreachable,
}

/// Mock fetcher for tests: canned responses keyed by URL.
///
/// Unknown URLs behave like a 404 page.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a page for a URL.
    pub fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Page(status, body.to_string()));
        self
    }

    /// Make a URL fail at the transport level.
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Unreachable);
        self
    }

    fn lookup(&self, url: &str) -> FetchResult<(u16, String)> {
        match self.responses.get(url) {
            Some(MockResponse::Page(status, body)) => Ok((*status, body.clone())),
            Some(MockResponse::Unreachable) => Err(FetchError::Http(Box::new(
                std::io::Error::other(format!("mock: unreachable {url}")),
            ))),
            None => Ok((404, String::new())),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn probe(&self, url: &str) -> FetchResult<u16> {
        self.lookup(url).map(|(status, _)| status)
    }

    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.lookup(url)
            .map(|(status, body)| FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_serves_pages() {
        let fetcher = MockFetcher::new()
            .with_page("https://a.example/ok", 200, "<html></html>")
            .with_unreachable("https://a.example/down");

        assert_eq!(fetcher.probe("https://a.example/ok").await.unwrap(), 200);
        assert_eq!(fetcher.probe("https://a.example/missing").await.unwrap(), 404);
        assert!(fetcher.probe("https://a.example/down").await.is_err());

        let page = fetcher.fetch("https://a.example/ok").await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html></html>");
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_malformed_url() {
        let fetcher = HttpFetcher::new();
        let err = fetcher.probe("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
