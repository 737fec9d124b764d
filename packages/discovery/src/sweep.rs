//! Link-health sweep.
//!
//! Re-checks stored links and removes postings whose source page has
//! gone away. A probe that fails at the transport level is a skip, not
//! a deletion: transient network blips must not eat postings.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::notify::{Channel, Notifier};
use crate::store::PostingStore;
use crate::types::SweepReport;

/// Status at or above which a link counts as dead.
const DEAD_STATUS: u16 = 300;

/// The sweep with its injected collaborators.
pub struct LinkSweep {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn PostingStore>,
    notifier: Arc<dyn Notifier>,
    fan_out: usize,
}

impl LinkSweep {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn PostingStore>,
        notifier: Arc<dyn Notifier>,
        fan_out: usize,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            fan_out: fan_out.max(1),
        }
    }

    /// Probe every stored link and delete the dead ones.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SweepReport> {
        let postings = self.store.all_postings().await?;

        let candidates: Vec<_> = postings
            .into_iter()
            .filter(|p| !p.link.is_empty())
            .collect();

        let probe_futures: Vec<_> = candidates
            .iter()
            .map(|posting| self.fetcher.probe(&posting.link))
            .collect();
        let probes: Vec<_> = stream::iter(probe_futures)
            .buffered(self.fan_out)
            .collect()
            .await;

        let mut report = SweepReport {
            probed: candidates.len(),
            ..Default::default()
        };

        for (posting, probe) in candidates.iter().zip(probes) {
            match probe {
                Ok(status) if status >= DEAD_STATUS => {
                    debug!(link = %posting.link, status, "dead link, deleting posting");
                    self.store.delete_posting(posting.id).await?;
                    report.deleted += 1;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(link = %posting.link, error = %e, "probe failed, keeping posting");
                    report.skipped += 1;
                }
            }
        }

        info!(
            probed = report.probed,
            deleted = report.deleted,
            skipped = report.skipped,
            "sweep complete"
        );
        self.notifier
            .notify_best_effort(
                Channel::Ops,
                &format!("sweep - {} jobs deleted", report.deleted),
            )
            .await;

        Ok(report)
    }
}
