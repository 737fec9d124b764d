//! Scheduled background runs using tokio-cron-scheduler.
//!
//! Three schedules drive the system:
//! - discovery every three hours
//! - dead link sweep daily at 01:00
//! - weekly digest Friday at 19:00
//!
//! Each tick logs failures and moves on; a bad run never takes the
//! scheduler down.

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::app::AppState;

/// Start all scheduled runs.
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Discovery run - every three hours
    let discovery_state = state.clone();
    let discovery_job = Job::new_async("0 0 */3 * * *", move |_uuid, _lock| {
        let state = discovery_state.clone();
        Box::pin(async move {
            match state.pipeline.run().await {
                Ok(report) => tracing::info!(?report, "Scheduled discovery run finished"),
                Err(e) => tracing::error!("Scheduled discovery run failed: {}", e),
            }
        })
    })?;
    scheduler.add(discovery_job).await?;

    // Dead link sweep - daily at 01:00
    let sweep_state = state.clone();
    let sweep_job = Job::new_async("0 0 1 * * *", move |_uuid, _lock| {
        let state = sweep_state.clone();
        Box::pin(async move {
            match state.sweep.run().await {
                Ok(report) => tracing::info!(
                    probed = report.probed,
                    deleted = report.deleted,
                    skipped = report.skipped,
                    "Scheduled link sweep finished"
                ),
                Err(e) => tracing::error!("Scheduled link sweep failed: {}", e),
            }
        })
    })?;
    scheduler.add(sweep_job).await?;

    // Weekly digest - Friday at 19:00
    let digest_state = state.clone();
    let digest_job = Job::new_async("0 0 19 * * FRI", move |_uuid, _lock| {
        let state = digest_state.clone();
        Box::pin(async move {
            match crate::digest::send_weekly_digest(
                state.store.as_ref(),
                state.notifier.as_ref(),
                state.digest_window_days,
                &state.jobs_base_url,
            )
            .await
            {
                Ok(sent) => tracing::info!(jobs = sent, "Scheduled digest finished"),
                Err(e) => tracing::error!("Scheduled digest failed: {}", e),
            }
        })
    })?;
    scheduler.add(digest_job).await?;

    scheduler.start().await?;

    tracing::info!(
        "Scheduled runs started (discovery every 3h, sweep daily 01:00, digest Friday 19:00)"
    );
    Ok(scheduler)
}
