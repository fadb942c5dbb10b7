use newswire_core::traits::{MarkerSet, WorkQueue};
use newswire_db::{PublishedMarkerRepository, WorkQueueRepository};

use crate::integration::common::setup_test_db;

#[tokio::test]
async fn claim_returns_payloads_in_push_order() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool);

    queue.push("first").await.unwrap();
    queue.push("second").await.unwrap();
    queue.push("third").await.unwrap();

    assert_eq!(queue.claim().await.unwrap().as_deref(), Some("first"));
    assert_eq!(queue.claim().await.unwrap().as_deref(), Some("second"));
    assert_eq!(queue.claim().await.unwrap().as_deref(), Some("third"));
}

#[tokio::test]
async fn claim_returns_none_when_empty() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool);

    assert!(queue.claim().await.unwrap().is_none());
}

#[tokio::test]
async fn each_payload_is_delivered_exactly_once() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool);

    queue.push("only").await.unwrap();

    assert_eq!(queue.claim().await.unwrap().as_deref(), Some("only"));
    assert!(queue.claim().await.unwrap().is_none());
    assert_eq!(queue.depth().await.unwrap(), 0);
}

#[tokio::test]
async fn depth_counts_queued_payloads() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool);

    assert_eq!(queue.depth().await.unwrap(), 0);
    queue.push("a").await.unwrap();
    queue.push("b").await.unwrap();
    assert_eq!(queue.depth().await.unwrap(), 2);
}

#[tokio::test]
async fn marker_membership_after_add() {
    let (pool, _container) = setup_test_db().await;
    let markers = PublishedMarkerRepository::new(pool);

    assert!(!markers.contains("article-1").await.unwrap());
    markers.add("article-1").await.unwrap();
    assert!(markers.contains("article-1").await.unwrap());
    assert!(!markers.contains("article-2").await.unwrap());
}

#[tokio::test]
async fn marker_add_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let markers = PublishedMarkerRepository::new(pool);

    markers.add("article-1").await.unwrap();
    markers.add("article-1").await.unwrap();
    assert!(markers.contains("article-1").await.unwrap());
}
