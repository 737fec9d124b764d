//! Weekly digest composition and delivery.

use discovery::{build_weekly_digest, Channel, Notifier, PostingStore, Result, WeeklyDigest};

/// Build the trailing-window digest and push it to subscribers.
///
/// Returns the number of jobs included. An empty window only pings
/// the ops channel so a silent week is still visible.
pub async fn send_weekly_digest(
    store: &dyn PostingStore,
    notifier: &dyn Notifier,
    window_days: i64,
    jobs_base_url: &str,
) -> Result<usize> {
    let digest = build_weekly_digest(store, window_days).await?;

    if digest.is_empty() {
        tracing::info!("No postings in the digest window, skipping subscriber push");
        notifier
            .notify_best_effort(Channel::Ops, "digest - no new jobs this week")
            .await;
        return Ok(0);
    }

    let text = compose_digest(&digest, jobs_base_url);
    notifier.notify(Channel::Subscribers, &text).await?;
    notifier
        .notify_best_effort(Channel::Ops, &format!("digest - {} jobs sent", digest.jobs.len()))
        .await;

    Ok(digest.jobs.len())
}

/// Render the digest as a numbered plain-text list.
fn compose_digest(digest: &WeeklyDigest, jobs_base_url: &str) -> String {
    let mut text = format!("{} jobs posted this week:\n\n", digest.jobs.len());

    for (idx, entry) in digest.jobs.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", idx + 1, entry.title));
        if let Some(company) = &entry.company {
            text.push_str(&format!("{}\n", company));
        }
        text.push_str(&format!("{}/{}\n", jobs_base_url, entry.slug));
        text.push_str(&format!(
            "Posted on {}\n\n",
            entry.posted_at.format("%d %b %Y")
        ));
    }

    text
}
