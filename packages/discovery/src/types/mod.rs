//! Data types for the discovery pipeline.

pub mod config;
pub mod digest;
pub mod outcome;
pub mod posting;

pub use config::DiscoveryConfig;
pub use digest::{DigestEntry, SchemaExcerpt, WeeklyDigest};
pub use outcome::{InsertOutcome, RunReport, SweepReport};
pub use posting::{HiringOrganization, JobCountRecord, JobSchema, NewPosting, Posting, SearchItem};
