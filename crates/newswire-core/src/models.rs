use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest urgency, assigned when a work descriptor omits `priority`.
pub const LOWEST_PRIORITY: i32 = 999;

fn default_priority() -> i32 {
    LOWEST_PRIORITY
}

/// One unit of work: an article URL to fetch and record.
///
/// Created by an external catalog, published by the producer, and carried
/// over the queue as serialized JSON. Immutable once created; `id` is an
/// opaque producer-assigned unique string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub url: String,
    pub source: String,
    pub category: String,
    /// Lower = more urgent. A scheduling hint for publish order only.
    #[serde(default = "default_priority")]
    pub priority: i32,
}

/// Outcome classification of a single extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Title present and body at least the minimum content length.
    Ok,
    PartialTitleMissing,
    PartialBodyMissing,
    /// Internal parse error, caught and reflected rather than raised.
    Failed(String),
}

impl ExtractionStatus {
    /// The message persisted in the record's `error` field, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ExtractionStatus::Ok => None,
            ExtractionStatus::PartialTitleMissing => Some("Could not extract title"),
            ExtractionStatus::PartialBodyMissing => {
                Some("Could not extract sufficient body content")
            }
            ExtractionStatus::Failed(reason) => Some(reason),
        }
    }
}

/// Best-effort structured output of the extractor. Always a value, never
/// an error; partial and failed extractions are normal outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: ExtractionStatus,
}

/// The persisted unit: work-item fields plus extraction output and
/// processing metadata. Keyed by `id`; the store's uniqueness constraint
/// guarantees at most one record per id under duplicate delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub url: String,
    pub source: String,
    pub category: String,
    pub priority: i32,
    pub title: Option<String>,
    pub body: Option<String>,
    pub error: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
    pub word_count: u32,
}

impl ArticleRecord {
    /// Assemble the record for a claimed item. `word_count` is derived
    /// from the body (whitespace tokens, 0 if absent) and `processed_at`
    /// is stamped now.
    pub fn new(
        item: WorkItem,
        title: Option<String>,
        body: Option<String>,
        error: Option<String>,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        let word_count = body
            .as_deref()
            .map(|b| b.split_whitespace().count() as u32)
            .unwrap_or(0);

        Self {
            id: item.id,
            url: item.url,
            source: item.source,
            category: item.category,
            priority: item.priority,
            title,
            body,
            error,
            scraped_at,
            processed_at: Utc::now(),
            word_count,
        }
    }
}
