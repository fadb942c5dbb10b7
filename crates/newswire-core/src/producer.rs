//! Publication of work items into the shared queue.
//!
//! Publishing is idempotent across runs: the marker set records every id
//! ever offered, and marked items are skipped. The order of operations is
//! enqueue-then-mark: a crash between the two steps causes at most one
//! duplicate enqueue, which the consumer's idempotent write absorbs,
//! whereas marking first could silently drop an item forever.

use crate::error::AppError;
use crate::models::WorkItem;
use crate::traits::{MarkerSet, WorkQueue};

/// Counts reported by a single publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: usize,
    pub skipped: usize,
}

/// Publishes a batch of work items into the queue, priority-ordered and
/// deduplicated against the marker set.
pub struct Producer<Q, M>
where
    Q: WorkQueue,
    M: MarkerSet,
{
    queue: Q,
    markers: M,
}

impl<Q, M> Producer<Q, M>
where
    Q: WorkQueue,
    M: MarkerSet,
{
    pub fn new(queue: Q, markers: M) -> Self {
        Self { queue, markers }
    }

    /// Publish all items, most urgent first.
    ///
    /// The priority sort is a scheduling hint only; the queue is FIFO
    /// once items are in it. Item-level failures are logged and counted
    /// as skipped; the run always completes.
    pub async fn publish_all(&self, mut items: Vec<WorkItem>) -> PublishReport {
        items.sort_by_key(|item| item.priority);

        let mut report = PublishReport::default();
        for item in &items {
            match self.publish_one(item).await {
                Ok(true) => report.published += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::error!(id = %item.id, error = %e, "Failed to publish work item");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            published = report.published,
            skipped = report.skipped,
            "Publishing complete"
        );
        match self.queue.depth().await {
            Ok(depth) => tracing::info!(depth, "Queue depth after run"),
            Err(e) => tracing::warn!(error = %e, "Failed to read queue depth"),
        }

        report
    }

    /// Returns `Ok(true)` if the item was enqueued, `Ok(false)` if it was
    /// already offered by an earlier run.
    async fn publish_one(&self, item: &WorkItem) -> Result<bool, AppError> {
        if self.markers.contains(&item.id).await? {
            tracing::info!(id = %item.id, "Already published, skipping");
            return Ok(false);
        }

        let payload = serde_json::to_string(item)?;
        self.queue.push(&payload).await?;
        self.markers.add(&item.id).await?;

        tracing::info!(id = %item.id, priority = item.priority, "Published work item");
        Ok(true)
    }
}
