//! Run outcome types.
//!
//! "Nothing vs. empty" is always an explicit variant here, never a
//! missing return value: callers branch on these to decide whether to
//! notify, and failures travel on the `Result` channel instead.

use serde::Serialize;

use super::posting::Posting;

/// Result of an insert batch after deduplication.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The postings that were actually written, in input order.
    Inserted(Vec<Posting>),

    /// Every candidate was already persisted; no write happened.
    NothingNew,
}

impl InsertOutcome {
    /// Number of records written.
    pub fn inserted_count(&self) -> usize {
        match self {
            InsertOutcome::Inserted(postings) => postings.len(),
            InsertOutcome::NothingNew => 0,
        }
    }
}

/// Outcome of one discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunReport {
    /// Search returned zero items, or no item carried a usable schema.
    /// Informational, not an error; zero store writes happened.
    NoJobsFound,

    /// Candidates existed but every link was already persisted.
    NothingNew { found: usize, extracted: usize },

    /// New postings were written.
    Inserted {
        found: usize,
        extracted: usize,
        inserted: usize,
    },
}

/// Outcome of one link-health sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Postings whose link was probed.
    pub probed: usize,

    /// Postings deleted because the probe returned status >= 300.
    pub deleted: usize,

    /// Postings left untouched because the probe itself failed
    /// (transient network problem, not a dead link).
    pub skipped: usize,
}
