pub mod consumer;
pub mod error;
pub mod extract;
pub mod models;
pub mod producer;
pub mod testutil;
pub mod traits;

pub use consumer::{ConsumerConfig, ConsumerService, TracingConsumerReporter};
pub use error::AppError;
pub use extract::extract;
pub use models::{ArticleRecord, ExtractionResult, ExtractionStatus, WorkItem};
pub use producer::{Producer, PublishReport};
pub use traits::{ArticleStore, Fetcher, InsertOutcome, MarkerSet, WorkQueue};
