//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::consumer::{ConsumerEvent, ConsumerReporter};
use crate::error::AppError;
use crate::models::{ArticleRecord, WorkItem};
use crate::traits::{ArticleStore, Fetcher, InsertOutcome, MarkerSet, WorkQueue};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML document.
    responses: Arc<Mutex<Vec<Result<Vec<u8>, AppError>>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(html.as_bytes().to_vec())])),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
        }
    }

    pub fn with_responses(responses: Vec<Result<Vec<u8>, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, AppError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(b"<html><body>default</body></html>".to_vec())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockWorkQueue
// ---------------------------------------------------------------------------

/// In-memory FIFO queue with scriptable push/claim failures.
#[derive(Clone)]
pub struct MockWorkQueue {
    items: Arc<Mutex<VecDeque<String>>>,
    push_errors: Arc<Mutex<Vec<AppError>>>,
    claim_errors: Arc<Mutex<Vec<AppError>>>,
}

impl MockWorkQueue {
    pub fn empty() -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::new())),
            push_errors: Arc::new(Mutex::new(Vec::new())),
            claim_errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue whose next push fails.
    pub fn with_push_error(error: AppError) -> Self {
        let queue = Self::empty();
        queue.push_errors.lock().unwrap().push(error);
        queue
    }

    /// Queue whose next claim fails.
    pub fn with_claim_error(error: AppError) -> Self {
        let queue = Self::empty();
        queue.claim_errors.lock().unwrap().push(error);
        queue
    }

    /// Snapshot of the queued payloads, head first.
    pub fn payloads(&self) -> Vec<String> {
        self.items.lock().unwrap().iter().cloned().collect()
    }
}

impl WorkQueue for MockWorkQueue {
    async fn push(&self, payload: &str) -> Result<(), AppError> {
        let mut errors = self.push_errors.lock().unwrap();
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        drop(errors);
        self.items.lock().unwrap().push_back(payload.to_string());
        Ok(())
    }

    async fn claim(&self) -> Result<Option<String>, AppError> {
        let mut errors = self.claim_errors.lock().unwrap();
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        drop(errors);
        Ok(self.items.lock().unwrap().pop_front())
    }

    async fn depth(&self) -> Result<i64, AppError> {
        Ok(self.items.lock().unwrap().len() as i64)
    }
}

// ---------------------------------------------------------------------------
// MockMarkerSet
// ---------------------------------------------------------------------------

/// In-memory marker set.
#[derive(Clone)]
pub struct MockMarkerSet {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl MockMarkerSet {
    pub fn empty() -> Self {
        Self {
            ids: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn ids(&self) -> HashSet<String> {
        self.ids.lock().unwrap().clone()
    }
}

impl MarkerSet for MockMarkerSet {
    async fn contains(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.ids.lock().unwrap().contains(id))
    }

    async fn add(&self, id: &str) -> Result<(), AppError> {
        self.ids.lock().unwrap().insert(id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Mock store that records inserts and enforces id uniqueness the way the
/// real store's constraint does.
#[derive(Clone)]
pub struct MockStore {
    records: Arc<Mutex<Vec<ArticleRecord>>>,
    insert_errors: Arc<Mutex<Vec<AppError>>>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            insert_errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Store whose next insert fails (subsequent inserts succeed).
    pub fn with_insert_error(error: AppError) -> Self {
        let store = Self::empty();
        store.insert_errors.lock().unwrap().push(error);
        store
    }

    pub fn records(&self) -> Vec<ArticleRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl ArticleStore for MockStore {
    async fn insert(&self, record: &ArticleRecord) -> Result<InsertOutcome, AppError> {
        let mut errors = self.insert_errors.lock().unwrap();
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        drop(errors);

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.id == record.id) {
            return Ok(InsertOutcome::Duplicate);
        }
        records.push(record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

// ---------------------------------------------------------------------------
// MockReporter
// ---------------------------------------------------------------------------

/// Consumer reporter that records event labels.
#[derive(Clone, Default)]
pub struct MockReporter {
    events: Arc<Mutex<Vec<String>>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ConsumerReporter for MockReporter {
    fn report(&self, event: ConsumerEvent<'_>) {
        let label = match &event {
            ConsumerEvent::Started { .. } => "Started",
            ConsumerEvent::Polling => "Polling",
            ConsumerEvent::ItemClaimed { .. } => "ItemClaimed",
            ConsumerEvent::MalformedPayload { .. } => "MalformedPayload",
            ConsumerEvent::RecordStored { .. } => "RecordStored",
            ConsumerEvent::DuplicateSuppressed { .. } => "DuplicateSuppressed",
            ConsumerEvent::PersistFailed { .. } => "PersistFailed",
            ConsumerEvent::Stopped { .. } => "Stopped",
        };
        self.events.lock().unwrap().push(label.to_string());
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a work item for testing.
pub fn make_test_item(id: &str, priority: i32) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        url: format!("https://example.com/articles/{id}"),
        source: "example-wire".to_string(),
        category: "technology".to_string(),
        priority,
    }
}

/// Create a serialized queue payload for testing.
pub fn make_test_payload(id: &str) -> String {
    serde_json::to_string(&make_test_item(id, 1)).expect("test item serializes")
}
