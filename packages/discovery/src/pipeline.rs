//! Discovery run orchestration.
//!
//! Query → paginated search → concurrent extraction → enrichment →
//! deduplicated insert → notifications. Collaborators are injected so
//! a run owns no ambient state; per-item failures degrade the item,
//! search and store failures abort the run and the next scheduled
//! activation starts clean.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::enrich;
use crate::error::Result;
use crate::extract::SchemaExtractor;
use crate::fetch::PageFetcher;
use crate::notify::{Channel, Notifier};
use crate::query::SearchQuery;
use crate::search::JobSearcher;
use crate::store::PostingStore;
use crate::types::{DiscoveryConfig, InsertOutcome, JobCountRecord, NewPosting, Posting, RunReport};

/// The discovery pipeline with its injected collaborators.
pub struct DiscoveryPipeline {
    searcher: Arc<dyn JobSearcher>,
    extractor: SchemaExtractor,
    store: Arc<dyn PostingStore>,
    notifier: Arc<dyn Notifier>,
    config: DiscoveryConfig,
}

impl DiscoveryPipeline {
    pub fn new(
        searcher: Arc<dyn JobSearcher>,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn PostingStore>,
        notifier: Arc<dyn Notifier>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            searcher,
            extractor: SchemaExtractor::new(fetcher),
            store,
            notifier,
            config,
        }
    }

    /// Execute one discovery run.
    ///
    /// Only schema-bearing items are persisted: a search hit whose page
    /// yields no JobPosting JSON-LD is dropped before enrichment.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunReport> {
        let query = SearchQuery::from_config(&self.config);
        info!(query = %query, "starting discovery run");

        let items = self.searcher.search_all(&query).await?;
        if items.is_empty() {
            info!("search returned no items");
            self.notifier
                .notify_best_effort(Channel::Ops, "discovery - no jobs found")
                .await;
            return Ok(RunReport::NoJobsFound);
        }

        // Concurrent extraction, bounded, output aligned with input
        // order so each schema lands next to its search item.
        let extractions: Vec<_> = items
            .iter()
            .map(|item| self.extractor.extract(&item.link))
            .collect();
        let schemas: Vec<_> = stream::iter(extractions)
            .buffered(self.config.fan_out)
            .collect()
            .await;

        let found = items.len();
        let candidates: Vec<NewPosting> = items
            .iter()
            .zip(schemas)
            .filter_map(|(item, schema)| {
                let schema = schema?;
                let keywords = enrich::keywords_for(item, &schema);
                let slug = enrich::slugify(&item.title, Some(&schema));
                Some(NewPosting {
                    link: item.link.clone(),
                    title: item.title.clone(),
                    schema: Some(schema),
                    keywords,
                    slug,
                    source: self.config.source.clone(),
                })
            })
            .collect();

        let extracted = candidates.len();
        info!(found, extracted, "extraction complete");

        if candidates.is_empty() {
            self.notifier
                .notify_best_effort(Channel::Ops, "discovery - no jobs found")
                .await;
            return Ok(RunReport::NoJobsFound);
        }

        match self.store.insert_new(candidates, Utc::now()).await? {
            InsertOutcome::NothingNew => {
                info!("all candidates already persisted");
                self.notifier
                    .notify_best_effort(Channel::Ops, "discovery - no jobs added because duplicates")
                    .await;
                Ok(RunReport::NothingNew { found, extracted })
            }
            InsertOutcome::Inserted(postings) => {
                let inserted = postings.len();
                info!(inserted, "new postings persisted");

                self.notifier
                    .notify_best_effort(Channel::Subscribers, &self.announcement(&postings))
                    .await;
                self.notifier
                    .notify_best_effort(Channel::Ops, &format!("discovery - {inserted} new jobs"))
                    .await;

                self.store
                    .record_job_count(&JobCountRecord {
                        count: inserted,
                        created_at: Utc::now(),
                    })
                    .await?;

                Ok(RunReport::Inserted {
                    found,
                    extracted,
                    inserted,
                })
            }
        }
    }

    /// Subscriber announcement: one line per job plus its public URL.
    fn announcement(&self, postings: &[Posting]) -> String {
        let mut text = format!("{} new jobs!\n\n", postings.len());

        for posting in postings {
            let apply_url = format!("{}/{}", self.config.jobs_base_url, posting.slug);

            let headline = match posting.schema.as_ref() {
                Some(schema) => {
                    let title = schema.title.as_deref().unwrap_or(&posting.title);
                    match schema.company() {
                        Some(company) => format!("{title} @ {company}"),
                        None => title.to_string(),
                    }
                }
                None => posting.title.clone(),
            };

            text.push_str(&format!("{headline}\n{apply_url}\n\n"));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::notify::MockNotifier;
    use crate::search::MockSearcher;
    use crate::store::MemoryStore;
    use crate::types::SearchItem;

    fn job_page(title: &str, company: &str, description: &str) -> String {
        format!(
            r#"<html><head><script type="application/ld+json">{{
                "@type": "JobPosting",
                "title": "{title}",
                "hiringOrganization": {{"@type": "Organization", "name": "{company}"}},
                "description": "{description}",
                "datePosted": "2024-02-01"
            }}</script></head></html>"#
        )
    }

    struct Harness {
        pipeline: DiscoveryPipeline,
        store: Arc<MemoryStore>,
        notifier: Arc<MockNotifier>,
    }

    fn harness(items: Vec<SearchItem>, fetcher: MockFetcher) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let pipeline = DiscoveryPipeline::new(
            Arc::new(MockSearcher::with_items(items)),
            Arc::new(fetcher),
            store.clone(),
            notifier.clone(),
            DiscoveryConfig::default(),
        );
        Harness {
            pipeline,
            store,
            notifier,
        }
    }

    #[tokio::test]
    async fn test_empty_search_is_no_jobs_found_with_zero_writes() {
        let h = harness(vec![], MockFetcher::new());

        let report = h.pipeline.run().await.unwrap();

        assert_eq!(report, RunReport::NoJobsFound);
        assert_eq!(h.store.posting_count(), 0);
        assert!(h.store.job_count_records().is_empty());
        assert_eq!(
            h.notifier.messages_for(Channel::Ops),
            vec!["discovery - no jobs found"]
        );
    }

    #[tokio::test]
    async fn test_mixed_batch_inserts_only_schema_bearing_item() {
        // A: valid JobPosting page. B: 404. C: malformed JSON-LD.
        let items = vec![
            SearchItem::new("https://a.example/j/a", "Job A", "Developer in Selangor, remote"),
            SearchItem::new("https://a.example/j/b", "Job B", ""),
            SearchItem::new("https://a.example/j/c", "Job C", ""),
        ];
        let fetcher = MockFetcher::new()
            .with_page(
                "https://a.example/j/a",
                200,
                &job_page("Backend Engineer", "Acme", "Remote friendly"),
            )
            .with_page("https://a.example/j/b", 404, "")
            .with_page(
                "https://a.example/j/c",
                200,
                r#"<script type="application/ld+json">{"@type": "JobPosting", oops</script>"#,
            );
        let h = harness(items, fetcher);

        let report = h.pipeline.run().await.unwrap();

        assert_eq!(
            report,
            RunReport::Inserted {
                found: 3,
                extracted: 1,
                inserted: 1,
            }
        );
        assert_eq!(h.store.posting_count(), 1);

        let stored = &h.store.all_postings().await.unwrap()[0];
        assert_eq!(stored.link, "https://a.example/j/a");
        assert!(stored.keywords.contains(&"selangor".to_string()));
        assert!(stored.keywords.contains(&"remote".to_string()));
        assert!(stored.slug.starts_with("backend-engineer-acme-"));
        assert_eq!(stored.posted_at.date_naive().to_string(), "2024-02-01");

        // Counter snapshot appended for the successful insert.
        assert_eq!(h.store.job_count_records().len(), 1);
        assert_eq!(h.store.job_count_records()[0].count, 1);

        // Subscriber announcement names the job and its public URL.
        let announcements = h.notifier.messages_for(Channel::Subscribers);
        assert_eq!(announcements.len(), 1);
        assert!(announcements[0].contains("Backend Engineer @ Acme"));
        assert!(announcements[0].contains(&stored.slug));
    }

    #[tokio::test]
    async fn test_no_schema_bearing_items_is_no_jobs_found() {
        let items = vec![SearchItem::new("https://a.example/j/x", "Job X", "")];
        let fetcher =
            MockFetcher::new().with_page("https://a.example/j/x", 200, "<html>no ld+json</html>");
        let h = harness(items, fetcher);

        let report = h.pipeline.run().await.unwrap();

        assert_eq!(report, RunReport::NoJobsFound);
        assert_eq!(h.store.posting_count(), 0);
    }

    #[tokio::test]
    async fn test_second_run_reports_nothing_new() {
        let items = vec![SearchItem::new("https://a.example/j/a", "Job A", "")];
        let page = job_page("Engineer", "Acme", "on-site");
        let make_fetcher = || MockFetcher::new().with_page("https://a.example/j/a", 200, &page);

        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MockNotifier::new());
        let run = |fetcher: MockFetcher| {
            DiscoveryPipeline::new(
                Arc::new(MockSearcher::with_items(items.clone())),
                Arc::new(fetcher),
                store.clone(),
                notifier.clone(),
                DiscoveryConfig::default(),
            )
        };

        let first = run(make_fetcher()).run().await.unwrap();
        assert!(matches!(first, RunReport::Inserted { inserted: 1, .. }));

        let second = run(make_fetcher()).run().await.unwrap();
        assert_eq!(
            second,
            RunReport::NothingNew {
                found: 1,
                extracted: 1,
            }
        );
        assert_eq!(store.posting_count(), 1);
        assert!(notifier
            .messages_for(Channel::Ops)
            .iter()
            .any(|m| m.contains("duplicates")));
    }

    #[tokio::test]
    async fn test_search_failure_aborts_run() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = DiscoveryPipeline::new(
            Arc::new(MockSearcher::failing()),
            Arc::new(MockFetcher::new()),
            store.clone(),
            Arc::new(MockNotifier::new()),
            DiscoveryConfig::default(),
        );

        assert!(pipeline.run().await.is_err());
        assert_eq!(store.posting_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_link_within_one_batch_inserts_once() {
        let items = vec![
            SearchItem::new("https://a.example/j/a", "Job A", ""),
            SearchItem::new("https://a.example/j/a", "Job A again", ""),
        ];
        let fetcher = MockFetcher::new().with_page(
            "https://a.example/j/a",
            200,
            &job_page("Engineer", "Acme", "on-site"),
        );
        let h = harness(items, fetcher);

        let report = h.pipeline.run().await.unwrap();

        assert!(matches!(report, RunReport::Inserted { inserted: 1, .. }));
        assert_eq!(h.store.posting_count(), 1);
    }
}
