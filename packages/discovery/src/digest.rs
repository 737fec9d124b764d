//! Digest query.
//!
//! Reconstructs the trailing window of newly stored postings matching
//! the location vocabulary and projects them into the payload the
//! digest composer consumes. Composition and delivery live outside
//! this crate.

use chrono::{Duration, Utc};

use crate::enrich::LOCATIONS;
use crate::error::Result;
use crate::store::PostingStore;
use crate::types::{DigestEntry, WeeklyDigest};

/// Build the digest payload for the trailing `window_days`.
///
/// Newest-first; only postings whose keyword set intersects the
/// location vocabulary are included.
pub async fn build_weekly_digest(
    store: &dyn PostingStore,
    window_days: i64,
) -> Result<WeeklyDigest> {
    let since = Utc::now() - Duration::days(window_days);
    let postings = store.recent_with_keywords(since, LOCATIONS).await?;

    Ok(WeeklyDigest {
        jobs: postings.iter().map(DigestEntry::from).collect(),
    })
}
