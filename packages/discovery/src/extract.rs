//! Structured-data extraction from job-posting pages.
//!
//! Given a URL: probe reachability, fetch the body, gather the text of
//! every `application/ld+json` script, and hand the concatenated blob
//! to the [`crate::jsonld`] scanner. Everything that can go wrong with
//! one page (unreachable, error status, no blocks, malformed JSON)
//! degrades to `None`; a bad page never aborts the batch.

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::debug;

use crate::fetch::PageFetcher;
use crate::jsonld;
use crate::types::JobSchema;

/// Concatenated inner text of all JSON-LD script blocks in a document.
///
/// Concatenation (not a list) is deliberate: it reproduces the raw
/// `}{` boundary the scanner is built to handle, and keeps this
/// function a plain string transform.
pub fn ld_json_text(html: &str) -> String {
    let document = Html::parse_document(html);
    // The selector literal is valid; parse can only fail on a typo.
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("ld+json selector must parse");

    document
        .select(&selector)
        .flat_map(|el| el.text())
        .collect()
}

/// Extracts JobPosting schemas from pages.
pub struct SchemaExtractor {
    fetcher: Arc<dyn PageFetcher>,
}

impl SchemaExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Extract the JobPosting schema embedded in the page at `url`.
    ///
    /// Returns `None` for unreachable pages (probe error status or
    /// transport failure), pages without JSON-LD, and malformed or
    /// non-JobPosting structured data.
    pub async fn extract(&self, url: &str) -> Option<JobSchema> {
        match self.fetcher.probe(url).await {
            Ok(status) if status >= 400 => {
                debug!(url = %url, status, "page unreachable, skipping");
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(url = %url, error = %e, "probe failed, skipping");
                return None;
            }
        }

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                debug!(url = %url, error = %e, "fetch failed, skipping");
                return None;
            }
        };

        if page.status >= 400 {
            return None;
        }

        let raw = ld_json_text(&page.body);
        if raw.trim().is_empty() {
            return None;
        }

        jsonld::extract_job_posting(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    fn page_with_scripts(scripts: &[&str]) -> String {
        let blocks: String = scripts
            .iter()
            .map(|s| format!(r#"<script type="application/ld+json">{s}</script>"#))
            .collect();
        format!("<html><head>{blocks}</head><body><h1>Job</h1></body></html>")
    }

    #[test]
    fn test_ld_json_text_concatenates_blocks() {
        let html = page_with_scripts(&[r#"{"a": 1}"#, r#"{"b": 2}"#]);
        assert_eq!(ld_json_text(&html), r#"{"a": 1}{"b": 2}"#);
    }

    #[test]
    fn test_ld_json_text_ignores_other_scripts() {
        let html = r#"<html><script>var x = {};</script><script type="application/ld+json">{"a":1}</script></html>"#;
        assert_eq!(ld_json_text(html), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_extract_accepts_job_posting() {
        let url = "https://a.example/j/1";
        let html = page_with_scripts(&[
            r#"{"@type": "Organization", "name": "Acme"}"#,
            r#"{"@type": "JobPosting", "title": "Platform Engineer"}"#,
        ]);
        let fetcher = Arc::new(MockFetcher::new().with_page(url, 200, &html));

        let schema = SchemaExtractor::new(fetcher).extract(url).await.unwrap();
        assert_eq!(schema.title.as_deref(), Some("Platform Engineer"));
    }

    #[tokio::test]
    async fn test_extract_rejects_wrong_type() {
        let url = "https://a.example/j/2";
        let html = page_with_scripts(&[r#"{"@type": "NewsArticle", "headline": "x"}"#]);
        let fetcher = Arc::new(MockFetcher::new().with_page(url, 200, &html));

        assert!(SchemaExtractor::new(fetcher).extract(url).await.is_none());
    }

    #[tokio::test]
    async fn test_extract_skips_error_status() {
        let url = "https://a.example/gone";
        let html = page_with_scripts(&[r#"{"@type": "JobPosting"}"#]);
        let fetcher = Arc::new(MockFetcher::new().with_page(url, 404, &html));

        assert!(SchemaExtractor::new(fetcher).extract(url).await.is_none());
    }

    #[tokio::test]
    async fn test_extract_skips_transport_failure() {
        let url = "https://a.example/down";
        let fetcher = Arc::new(MockFetcher::new().with_unreachable(url));

        assert!(SchemaExtractor::new(fetcher).extract(url).await.is_none());
    }

    #[tokio::test]
    async fn test_extract_skips_malformed_blocks() {
        let url = "https://a.example/broken";
        let html = page_with_scripts(&[r#"{"@type": "JobPosting", "title": "#]);
        let fetcher = Arc::new(MockFetcher::new().with_page(url, 200, &html));

        assert!(SchemaExtractor::new(fetcher).extract(url).await.is_none());
    }

    #[tokio::test]
    async fn test_extract_skips_page_without_json_ld() {
        let url = "https://a.example/plain";
        let fetcher =
            Arc::new(MockFetcher::new().with_page(url, 200, "<html><body>hi</body></html>"));

        assert!(SchemaExtractor::new(fetcher).extract(url).await.is_none());
    }
}
