use std::future::Future;

use crate::error::AppError;
use crate::models::ArticleRecord;

/// Fetches raw content from a URL.
///
/// Implementations own timeout and transient-failure retry; callers see
/// either the response bytes or a typed terminal error.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;
}

/// Shared FIFO work queue carrying serialized [`crate::models::WorkItem`]s.
///
/// `claim` must deliver each payload to exactly one claimant; the pop is
/// the pipeline's only mutual-exclusion point.
pub trait WorkQueue: Send + Sync + Clone {
    /// Append a payload to the tail.
    fn push(&self, payload: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Pop the head payload, or `None` when the queue is empty.
    fn claim(&self) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    /// Number of payloads currently queued. Observability only.
    fn depth(&self) -> impl Future<Output = Result<i64, AppError>> + Send;
}

/// Durable set of work-item ids already offered to the queue.
///
/// Grows monotonically; never pruned. Guards the producer against
/// re-offering across runs.
pub trait MarkerSet: Send + Sync + Clone {
    fn contains(&self, id: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    fn add(&self, id: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Result of an idempotent insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with this id already exists; the write was a no-op.
    Duplicate,
}

/// Persists article records, keyed by id with a uniqueness constraint.
///
/// A duplicate id is an expected outcome under at-least-once delivery and
/// is reported as [`InsertOutcome::Duplicate`], not as an error.
pub trait ArticleStore: Send + Sync + Clone {
    fn insert(
        &self,
        record: &ArticleRecord,
    ) -> impl Future<Output = Result<InsertOutcome, AppError>> + Send;
}
