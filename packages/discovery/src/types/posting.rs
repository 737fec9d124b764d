//! Posting types - search hits, extracted schemas, and persisted records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A raw item returned by the search source.
///
/// Transient: discarded once mapped into a [`NewPosting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    /// Source URL. Identity key for deduplication.
    pub link: String,

    /// Result title as reported by the search source.
    pub title: String,

    /// Short HTML fragment used for keyword inference.
    pub html_snippet: String,
}

impl SearchItem {
    /// Create a new search item.
    pub fn new(
        link: impl Into<String>,
        title: impl Into<String>,
        html_snippet: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            html_snippet: html_snippet.into(),
        }
    }
}

/// The hiring organization member of a JobPosting schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiringOrganization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Any other members the page emitted, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Structured JobPosting data extracted from a page's JSON-LD.
///
/// Every field is optional; pages embed wildly varying subsets. Unknown
/// members are kept in `extra` so an accepted object survives
/// re-serialization with its source fields intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSchema {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "hiringOrganization", skip_serializing_if = "Option::is_none")]
    pub hiring_organization: Option<HiringOrganization>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,

    #[serde(rename = "datePosted", skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl JobSchema {
    /// Company name, if the schema carries one.
    pub fn company(&self) -> Option<&str> {
        self.hiring_organization
            .as_ref()
            .and_then(|o| o.name.as_deref())
    }

    /// Parse the schema's publish date.
    ///
    /// Pages emit `datePosted` as either a full RFC 3339 timestamp or a
    /// bare `YYYY-MM-DD` date. Anything else is treated as absent.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date_posted.as_deref()?;

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// A candidate posting produced by the pipeline, not yet persisted.
///
/// Timestamps and the record id are assigned by the store at insert
/// time so a whole batch shares one `created_at`.
#[derive(Debug, Clone)]
pub struct NewPosting {
    pub link: String,
    pub title: String,
    pub schema: Option<JobSchema>,
    pub keywords: Vec<String>,
    pub slug: String,
    /// Origin tag, e.g. `"organic"` for search-discovered postings.
    pub source: String,
}

impl NewPosting {
    /// Materialize into a persisted record.
    ///
    /// `posted_at` comes from the schema's publish date when parseable,
    /// else falls back to the shared batch `created_at`.
    pub fn into_posting(self, created_at: DateTime<Utc>) -> Posting {
        let posted_at = self
            .schema
            .as_ref()
            .and_then(|s| s.posted_at())
            .unwrap_or(created_at);

        Posting {
            id: Uuid::new_v4(),
            link: self.link,
            title: self.title,
            schema: self.schema,
            keywords: self.keywords,
            slug: self.slug,
            source: self.source,
            created_at,
            posted_at,
        }
    }
}

/// A persisted job posting, keyed by source link.
///
/// Created once on first successful ingest, never updated, deleted only
/// by the link-health sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub id: Uuid,

    /// Unique natural key. No two postings share a link.
    pub link: String,

    pub title: String,
    pub schema: Option<JobSchema>,
    pub keywords: Vec<String>,
    pub slug: String,
    pub source: String,

    /// Ingestion timestamp, shared across one insert batch.
    pub created_at: DateTime<Utc>,

    /// Schema-provided publish date, else `created_at`.
    pub posted_at: DateTime<Utc>,
}

/// Append-only counter snapshot written after each run that inserted
/// postings. Audit trail only; never mutated or deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCountRecord {
    pub count: usize,
    pub created_at: DateTime<Utc>,
}
