use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::extract::extract;
use crate::models::{ArticleRecord, WorkItem};
use crate::traits::{ArticleStore, Fetcher, InsertOutcome, WorkQueue};

/// Events emitted by the consumer for monitoring/logging.
#[derive(Debug, Clone)]
pub enum ConsumerEvent<'a> {
    Started {
        consumer_id: &'a str,
    },
    Polling,
    ItemClaimed {
        id: &'a str,
        url: &'a str,
    },
    /// A queue payload that failed to deserialize. Dropped, not requeued.
    MalformedPayload {
        error: &'a str,
    },
    RecordStored {
        id: &'a str,
        word_count: u32,
    },
    /// The record already existed: duplicate delivery absorbed.
    DuplicateSuppressed {
        id: &'a str,
    },
    /// Store failure other than a duplicate; the item is abandoned.
    PersistFailed {
        id: &'a str,
        error: &'a str,
    },
    Stopped {
        consumer_id: &'a str,
    },
}

/// Trait for receiving consumer events (decoupled logging).
pub trait ConsumerReporter: Send + Sync {
    fn report(&self, event: ConsumerEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsumerReporter;

impl ConsumerReporter for TracingConsumerReporter {
    fn report(&self, event: ConsumerEvent<'_>) {
        match event {
            ConsumerEvent::Started { consumer_id } => {
                tracing::info!(%consumer_id, "Consumer started, waiting for tasks");
            }
            ConsumerEvent::Polling => {
                tracing::debug!("Polling for work items");
            }
            ConsumerEvent::ItemClaimed { id, url } => {
                tracing::info!(%id, %url, "Processing article");
            }
            ConsumerEvent::MalformedPayload { error } => {
                tracing::error!(%error, "Malformed queue payload, dropping");
            }
            ConsumerEvent::RecordStored { id, word_count } => {
                tracing::info!(%id, %word_count, "Stored article record");
            }
            ConsumerEvent::DuplicateSuppressed { id } => {
                tracing::info!(%id, "Article already exists, insert suppressed");
            }
            ConsumerEvent::PersistFailed { id, error } => {
                tracing::error!(%id, %error, "Failed to persist record, abandoning item");
            }
            ConsumerEvent::Stopped { consumer_id } => {
                tracing::info!(%consumer_id, "Consumer stopped");
            }
        }
    }
}

/// Configuration for a consumer instance.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub consumer_id: String,
    /// Bound on the idle wait between claims; also the shutdown latency
    /// bound when the queue is empty.
    pub poll_interval: Duration,
    /// Fixed delay after a claim failure, so a queue outage degrades to
    /// slow polling instead of a hot error loop.
    pub fault_backoff: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            consumer_id: format!("consumer-{}", &Uuid::new_v4().to_string()[..8]),
            poll_interval: Duration::from_secs(1),
            fault_backoff: Duration::from_secs(5),
        }
    }
}

impl ConsumerConfig {
    pub fn with_consumer_id(mut self, id: impl Into<String>) -> Self {
        self.consumer_id = id.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_fault_backoff(mut self, backoff: Duration) -> Self {
        self.fault_backoff = backoff;
        self
    }
}

/// Consumer that claims work items from the queue one at a time and runs
/// each through fetch → extract → idempotent insert.
///
/// No internal parallelism: throughput scales by running more instances
/// against the same queue. A single item's failure never terminates the
/// loop; every claimed item ends as either a stored record (possibly
/// with `error` populated), a suppressed duplicate, or a logged loss.
pub struct ConsumerService<Q, F, S>
where
    Q: WorkQueue,
    F: Fetcher,
    S: ArticleStore,
{
    queue: Q,
    fetcher: F,
    store: S,
    config: ConsumerConfig,
}

impl<Q, F, S> ConsumerService<Q, F, S>
where
    Q: WorkQueue,
    F: Fetcher,
    S: ArticleStore,
{
    pub fn new(queue: Q, fetcher: F, store: S, config: ConsumerConfig) -> Self {
        Self {
            queue,
            fetcher,
            store,
            config,
        }
    }

    /// Run the consumer loop until cancellation.
    ///
    /// Cancellation is observed at the idle/claim boundary, so shutdown
    /// latency is bounded by the poll interval plus any in-flight item.
    pub async fn run<R: ConsumerReporter>(&self, cancel_token: CancellationToken, reporter: &R) {
        reporter.report(ConsumerEvent::Started {
            consumer_id: &self.config.consumer_id,
        });

        loop {
            if cancel_token.is_cancelled() {
                break;
            }

            reporter.report(ConsumerEvent::Polling);

            match self.queue.claim().await {
                Ok(Some(payload)) => {
                    self.process(&payload, reporter).await;
                }
                Ok(None) => {
                    tokio::select! {
                        () = tokio::time::sleep(self.config.poll_interval) => {}
                        () = cancel_token.cancelled() => break,
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim from queue");
                    tokio::select! {
                        () = tokio::time::sleep(self.config.fault_backoff) => {}
                        () = cancel_token.cancelled() => break,
                    }
                }
            }
        }

        reporter.report(ConsumerEvent::Stopped {
            consumer_id: &self.config.consumer_id,
        });
    }

    /// One iteration: deserialize, fetch, extract, insert.
    ///
    /// The item is already popped, so every exit path here either stores
    /// a record or logs why it could not.
    async fn process<R: ConsumerReporter>(&self, payload: &str, reporter: &R) {
        let item: WorkItem = match serde_json::from_str(payload) {
            Ok(item) => item,
            Err(e) => {
                reporter.report(ConsumerEvent::MalformedPayload {
                    error: &e.to_string(),
                });
                return;
            }
        };

        reporter.report(ConsumerEvent::ItemClaimed {
            id: &item.id,
            url: &item.url,
        });

        let scraped_at = Utc::now();
        let (title, body, error) = match self.fetcher.fetch(&item.url).await {
            Ok(raw) => {
                let result = extract(&raw);
                let error = result.status.error_message().map(str::to_owned);
                (result.title, result.body, error)
            }
            // A failed fetch still yields a record, with the failure in
            // the error field and no content.
            Err(e) => (None, None, Some(e.to_string())),
        };

        let record = ArticleRecord::new(item, title, body, error, scraped_at);

        match self.store.insert(&record).await {
            Ok(InsertOutcome::Inserted) => {
                reporter.report(ConsumerEvent::RecordStored {
                    id: &record.id,
                    word_count: record.word_count,
                });
            }
            Ok(InsertOutcome::Duplicate) => {
                reporter.report(ConsumerEvent::DuplicateSuppressed { id: &record.id });
            }
            Err(e) => {
                reporter.report(ConsumerEvent::PersistFailed {
                    id: &record.id,
                    error: &e.to_string(),
                });
            }
        }
    }
}
