//! In-memory store for tests and development.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{JobCountRecord, Posting};

use super::PostingStore;

/// In-memory posting store. Data is lost on drop; not for production.
#[derive(Default)]
pub struct MemoryStore {
    postings: RwLock<Vec<Posting>>,
    job_counts: RwLock<Vec<JobCountRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored postings.
    pub fn posting_count(&self) -> usize {
        self.postings.read().unwrap().len()
    }

    /// Number of appended counter snapshots.
    pub fn job_count_records(&self) -> Vec<JobCountRecord> {
        self.job_counts.read().unwrap().clone()
    }
}

#[async_trait]
impl PostingStore for MemoryStore {
    async fn existing_links(&self, links: &[String]) -> Result<HashSet<String>> {
        let wanted: HashSet<&String> = links.iter().collect();
        Ok(self
            .postings
            .read()
            .unwrap()
            .iter()
            .filter(|p| wanted.contains(&p.link))
            .map(|p| p.link.clone())
            .collect())
    }

    async fn insert_postings(&self, postings: &[Posting]) -> Result<()> {
        self.postings
            .write()
            .unwrap()
            .extend(postings.iter().cloned());
        Ok(())
    }

    async fn recent_with_keywords(
        &self,
        since: DateTime<Utc>,
        vocabulary: &[&str],
    ) -> Result<Vec<Posting>> {
        let mut matching: Vec<Posting> = self
            .postings
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.created_at >= since)
            .filter(|p| p.keywords.iter().any(|k| vocabulary.contains(&k.as_str())))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn all_postings(&self) -> Result<Vec<Posting>> {
        Ok(self.postings.read().unwrap().clone())
    }

    async fn delete_posting(&self, id: Uuid) -> Result<()> {
        self.postings.write().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn record_job_count(&self, record: &JobCountRecord) -> Result<()> {
        self.job_counts.write().unwrap().push(record.clone());
        Ok(())
    }
}
