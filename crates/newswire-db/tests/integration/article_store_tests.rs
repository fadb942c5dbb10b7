use chrono::Utc;
use newswire_core::models::ArticleRecord;
use newswire_core::testutil::make_test_item;
use newswire_core::traits::InsertOutcome;
use newswire_db::ArticleRepository;

use crate::integration::common::setup_test_db;

fn test_record(id: &str, title: &str) -> ArticleRecord {
    ArticleRecord::new(
        make_test_item(id, 1),
        Some(title.to_string()),
        Some("A body with exactly seven whitespace tokens".to_string()),
        None,
        Utc::now(),
    )
}

#[tokio::test]
async fn insert_and_get_roundtrip() {
    let (pool, _container) = setup_test_db().await;
    let repo = ArticleRepository::new(pool);

    let record = test_record("a-1", "Roundtrip");
    let outcome = repo.insert(&record).await.unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    let stored = repo.get("a-1").await.unwrap().expect("record exists");
    assert_eq!(stored.id, "a-1");
    assert_eq!(stored.url, record.url);
    assert_eq!(stored.source, record.source);
    assert_eq!(stored.category, record.category);
    assert_eq!(stored.priority, 1);
    assert_eq!(stored.title.as_deref(), Some("Roundtrip"));
    assert_eq!(stored.word_count, 7);
    assert!(stored.error.is_none());
}

#[tokio::test]
async fn get_returns_none_for_unknown_id() {
    let (pool, _container) = setup_test_db().await;
    let repo = ArticleRepository::new(pool);

    assert!(repo.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_insert_is_a_suppressed_no_op() {
    let (pool, _container) = setup_test_db().await;
    let repo = ArticleRepository::new(pool);

    let first = test_record("a-1", "Original");
    assert_eq!(repo.insert(&first).await.unwrap(), InsertOutcome::Inserted);

    // Same id from a duplicate delivery; different content must not win.
    let second = test_record("a-1", "Replay");
    assert_eq!(repo.insert(&second).await.unwrap(), InsertOutcome::Duplicate);

    assert_eq!(repo.count().await.unwrap(), 1);
    let stored = repo.get("a-1").await.unwrap().unwrap();
    assert_eq!(stored.title.as_deref(), Some("Original"));
}

#[tokio::test]
async fn racing_inserts_store_exactly_one_record() {
    let (pool, _container) = setup_test_db().await;
    let repo = ArticleRepository::new(pool);

    // Two consumers finishing the same duplicated delivery at once.
    let record = test_record("a-1", "Raced");
    let (left, right) = tokio::join!(repo.insert(&record), repo.insert(&record));
    let outcomes = [left.unwrap(), right.unwrap()];

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == InsertOutcome::Inserted)
            .count(),
        1
    );
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == InsertOutcome::Duplicate)
            .count(),
        1
    );
}

#[tokio::test]
async fn record_with_error_and_no_body_is_storable() {
    let (pool, _container) = setup_test_db().await;
    let repo = ArticleRepository::new(pool);

    let record = ArticleRecord::new(
        make_test_item("failed-fetch", 3),
        None,
        None,
        Some("Request timed out after 10 seconds".to_string()),
        Utc::now(),
    );
    assert_eq!(repo.insert(&record).await.unwrap(), InsertOutcome::Inserted);

    let stored = repo.get("failed-fetch").await.unwrap().unwrap();
    assert!(stored.title.is_none());
    assert!(stored.body.is_none());
    assert_eq!(stored.word_count, 0);
    assert_eq!(
        stored.error.as_deref(),
        Some("Request timed out after 10 seconds")
    );
}
