//! Digest payload types - the contract handed to the digest composer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::posting::Posting;

/// Reduced schema projection carried in a digest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExcerpt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(rename = "datePosted", skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
}

/// One posting projected for the digest consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestEntry {
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    pub title: String,
    pub slug: String,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaExcerpt>,
}

impl From<&Posting> for DigestEntry {
    fn from(posting: &Posting) -> Self {
        let schema = posting.schema.as_ref().map(|s| SchemaExcerpt {
            title: s.title.clone(),
            company: s.company().map(String::from),
            date_posted: s.date_posted.clone(),
        });

        // Prefer the schema title: search result titles carry site
        // chrome ("... - JobStreet") the schema does not.
        let title = posting
            .schema
            .as_ref()
            .and_then(|s| s.title.clone())
            .unwrap_or_else(|| posting.title.clone());

        Self {
            source: posting.source.clone(),
            company: schema.as_ref().and_then(|s| s.company.clone()),
            title,
            slug: posting.slug.clone(),
            posted_at: posting.posted_at,
            created_at: posting.created_at,
            schema,
        }
    }
}

/// The trailing-window digest payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDigest {
    pub jobs: Vec<DigestEntry>,
}

impl WeeklyDigest {
    /// True when the window contained no matching postings.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
