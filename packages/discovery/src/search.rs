//! Paginated search client for job-posting discovery.
//!
//! Abstracts over the search source so the pipeline can be tested
//! without the network. The concrete implementation drives Google
//! Custom Search across result pages until exhaustion.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DiscoveryError, Result};
use crate::query::SearchQuery;
use crate::types::SearchItem;

/// Fixed page size of the search API's `start` offset paging.
pub const PAGE_SIZE: u32 = 10;

/// Search source for discovering job-posting pages.
#[async_trait]
pub trait JobSearcher: Send + Sync {
    /// Collect every result page for the query.
    ///
    /// An empty first page yields `Ok(vec![])`. A transport or non-2xx
    /// failure is an error: partial pagination state cannot be resumed
    /// mid-query, so the whole discovery run aborts and the next
    /// scheduled activation self-heals.
    async fn search_all(&self, query: &SearchQuery) -> Result<Vec<SearchItem>>;
}

/// Google Custom Search response, reduced to what the pipeline reads.
#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,

    #[serde(default)]
    queries: CseQueries,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: String,

    #[serde(default)]
    title: String,

    #[serde(default, rename = "htmlSnippet")]
    html_snippet: String,
}

/// Presence of `nextPage` is the only pagination signal the API gives.
#[derive(Debug, Default, Deserialize)]
struct CseQueries {
    #[serde(rename = "nextPage")]
    next_page: Option<serde_json::Value>,
}

impl CseResponse {
    fn has_next_page(&self) -> bool {
        self.queries.next_page.is_some()
    }
}

/// Google Custom Search client.
pub struct GoogleSearcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    cx: String,
}

impl GoogleSearcher {
    /// Create a client for the given API key and engine id.
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: api_key.into(),
            cx: cx.into(),
        }
    }

    /// Point the client at a different endpoint (testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_page(&self, query: &SearchQuery, start: u32) -> Result<CseResponse> {
        debug!(start, "fetching search result page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", query.as_str()),
                ("start", &start.to_string()),
            ])
            .send()
            .await
            .map_err(|e| DiscoveryError::Search(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Search(Box::new(std::io::Error::other(
                format!("search API error {status}: {body}"),
            ))));
        }

        response
            .json::<CseResponse>()
            .await
            .map_err(|e| DiscoveryError::Search(Box::new(e)))
    }
}

#[async_trait]
impl JobSearcher for GoogleSearcher {
    async fn search_all(&self, query: &SearchQuery) -> Result<Vec<SearchItem>> {
        let mut items = Vec::new();
        let mut start = 1;

        loop {
            let page = self.fetch_page(query, start).await?;

            items.extend(page.items.iter().map(|i| SearchItem {
                link: i.link.clone(),
                title: i.title.clone(),
                html_snippet: i.html_snippet.clone(),
            }));

            if !page.has_next_page() {
                break;
            }
            start += PAGE_SIZE;
        }

        info!(count = items.len(), "search exhausted");
        Ok(items)
    }
}

/// Mock searcher for tests: serves canned pages, or an injected error.
#[derive(Default)]
pub struct MockSearcher {
    items: Vec<SearchItem>,
    fail: bool,
}

impl MockSearcher {
    /// Searcher that returns the given items in one page.
    pub fn with_items(items: Vec<SearchItem>) -> Self {
        Self { items, fail: false }
    }

    /// Searcher that fails every call.
    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl JobSearcher for MockSearcher {
    async fn search_all(&self, _query: &SearchQuery) -> Result<Vec<SearchItem>> {
        if self.fail {
            return Err(DiscoveryError::Search(Box::new(std::io::Error::other(
                "mock search failure",
            ))));
        }
        Ok(self.items.clone())
    }
}
