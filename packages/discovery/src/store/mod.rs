//! Posting persistence.
//!
//! One trait seam over the document store so the pipeline runs against
//! [`MemoryStore`] in tests and [`PostgresStore`] in production. The
//! dedup-then-insert step lives here as a provided method: it is a
//! deliberate two-phase read-then-write, so under truly concurrent runs
//! the acceptable failure mode is a rare duplicate attempt on the
//! natural key, never corruption. Implementations keep that harmless
//! (Postgres inserts with `ON CONFLICT DO NOTHING`).

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{InsertOutcome, JobCountRecord, NewPosting, Posting};

/// Document store for postings plus the append-only job counter.
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Which of the given links already have a persisted posting.
    async fn existing_links(&self, links: &[String]) -> Result<HashSet<String>>;

    /// Insert fully-materialized postings in one batch.
    ///
    /// Callers go through [`PostingStore::insert_new`]; this is the raw
    /// write half of the two-phase step.
    async fn insert_postings(&self, postings: &[Posting]) -> Result<()>;

    /// Postings created after `since` whose keyword set intersects the
    /// given vocabulary, ordered newest-first.
    async fn recent_with_keywords(
        &self,
        since: DateTime<Utc>,
        vocabulary: &[&str],
    ) -> Result<Vec<Posting>>;

    /// Every persisted posting (for the link-health sweep).
    async fn all_postings(&self) -> Result<Vec<Posting>>;

    /// Delete one posting by id.
    async fn delete_posting(&self, id: Uuid) -> Result<()>;

    /// Append a counter snapshot. Never mutated afterwards.
    async fn record_job_count(&self, record: &JobCountRecord) -> Result<()>;

    /// Deduplicate candidates against the store and insert the unseen
    /// subset in one batch.
    ///
    /// The whole batch shares `created_at`; each item's `posted_at`
    /// falls out of its schema (see [`NewPosting::into_posting`]).
    /// A link appearing twice within one batch is inserted once.
    /// Returns [`InsertOutcome::NothingNew`] when no write happened,
    /// so callers can branch on "duplicates only" distinctly from an
    /// insert failure.
    async fn insert_new(
        &self,
        candidates: Vec<NewPosting>,
        created_at: DateTime<Utc>,
    ) -> Result<InsertOutcome> {
        let mut seen = HashSet::new();
        let candidates: Vec<NewPosting> = candidates
            .into_iter()
            .filter(|c| seen.insert(c.link.clone()))
            .collect();

        if candidates.is_empty() {
            return Ok(InsertOutcome::NothingNew);
        }

        let links: Vec<String> = candidates.iter().map(|c| c.link.clone()).collect();
        let existing = self.existing_links(&links).await?;

        let fresh: Vec<Posting> = candidates
            .into_iter()
            .filter(|c| !existing.contains(&c.link))
            .map(|c| c.into_posting(created_at))
            .collect();

        if fresh.is_empty() {
            return Ok(InsertOutcome::NothingNew);
        }

        self.insert_postings(&fresh).await?;
        Ok(InsertOutcome::Inserted(fresh))
    }
}
