//! Job-Posting Discovery Pipeline
//!
//! Periodically discovers job-posting pages via a web search API,
//! extracts the JobPosting JSON-LD embedded in each page, enriches new
//! postings with keywords and a unique slug, persists the unseen subset
//! keyed by source link, and fans out notifications. A digest query and
//! a dead-link sweep run independently against the same store.
//!
//! # Design
//!
//! - Trait seams at every external boundary (`JobSearcher`,
//!   `PageFetcher`, `PostingStore`, `Notifier`) with hand-rolled mocks
//!   beside each trait, so the whole pipeline is testable without
//!   network or database.
//! - Per-item failures degrade the item (no schema / skip); only search
//!   and storage failures abort a run.
//! - Dedup is a two-phase read-then-write on the `link` natural key;
//!   rare overlapping runs degrade to at-least-once, never corruption.
//!
//! # Modules
//!
//! - [`query`] - search query construction
//! - [`search`] - paginated search client
//! - [`fetch`] / [`jsonld`] / [`extract`] - structured-data extraction
//! - [`enrich`] - keywords, remote inference, slugs
//! - [`store`] - deduplicated persistence (memory, postgres)
//! - [`digest`] - trailing-window digest query
//! - [`sweep`] - link-health sweep
//! - [`notify`] - notification boundary
//! - [`pipeline`] - discovery run orchestration

pub mod digest;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod jsonld;
pub mod notify;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod store;
pub mod sweep;
pub mod types;

pub use digest::build_weekly_digest;
pub use error::{DiscoveryError, FetchError, Result};
pub use extract::SchemaExtractor;
pub use fetch::{HttpFetcher, MockFetcher, PageFetcher};
pub use notify::{Channel, MockNotifier, NoopNotifier, Notifier, TelegramNotifier};
pub use pipeline::DiscoveryPipeline;
pub use query::SearchQuery;
pub use search::{GoogleSearcher, JobSearcher, MockSearcher};
pub use store::{MemoryStore, PostingStore};
#[cfg(feature = "postgres")]
pub use store::PostgresStore;
pub use sweep::LinkSweep;
pub use types::{
    DigestEntry, DiscoveryConfig, InsertOutcome, JobCountRecord, JobSchema, NewPosting, Posting,
    RunReport, SearchItem, SweepReport, WeeklyDigest,
};
