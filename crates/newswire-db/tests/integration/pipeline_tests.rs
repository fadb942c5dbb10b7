//! Producer → queue → consumer → store, against a real PostgreSQL
//! backend. Only the HTTP fetch is mocked.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use newswire_core::consumer::{ConsumerConfig, ConsumerService};
use newswire_core::producer::Producer;
use newswire_core::testutil::{MockFetcher, MockReporter, make_test_item};
use newswire_core::traits::WorkQueue;
use newswire_db::{ArticleRepository, PublishedMarkerRepository, WorkQueueRepository};

use crate::integration::common::setup_test_db;

#[tokio::test]
async fn republished_batch_enqueues_each_id_once() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool.clone());
    let markers = PublishedMarkerRepository::new(pool);
    let producer = Producer::new(queue.clone(), markers);

    let batch = vec![make_test_item("a-1", 2), make_test_item("a-2", 1)];

    let first = producer.publish_all(batch.clone()).await;
    assert_eq!(first.published, 2);
    assert_eq!(queue.depth().await.unwrap(), 2);

    // The same catalog offered again in a later run.
    let second = producer.publish_all(batch).await;
    assert_eq!(second.published, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(queue.depth().await.unwrap(), 2);
}

#[tokio::test]
async fn published_items_drain_into_stored_records() {
    let (pool, _container) = setup_test_db().await;
    let queue = WorkQueueRepository::new(pool.clone());
    let markers = PublishedMarkerRepository::new(pool.clone());
    let articles = ArticleRepository::new(pool);

    let producer = Producer::new(queue.clone(), markers);
    let report = producer
        .publish_all(vec![make_test_item("a-1", 5), make_test_item("a-2", 1)])
        .await;
    assert_eq!(report.published, 2);

    let html = format!(
        "<html><body><h1>Wire Story</h1><article>{}</article></body></html>",
        "Steady copy for the integration drain. ".repeat(5)
    );
    let config = ConsumerConfig::default()
        .with_consumer_id("consumer-it")
        .with_poll_interval(Duration::from_millis(10));
    let service = ConsumerService::new(
        queue.clone(),
        MockFetcher::with_responses(vec![
            Ok(html.as_bytes().to_vec()),
            Ok(html.as_bytes().to_vec()),
        ]),
        articles.clone(),
        config,
    );

    let token = CancellationToken::new();
    let run_token = token.clone();
    let handle = tokio::spawn(async move {
        service.run(run_token, &MockReporter::new()).await;
    });

    // Give the loop time to drain both items, then stop it.
    tokio::time::sleep(Duration::from_millis(500)).await;
    token.cancel();
    handle.await.unwrap();

    assert_eq!(queue.depth().await.unwrap(), 0);
    for id in ["a-1", "a-2"] {
        let stored = articles.get(id).await.unwrap().expect("record stored");
        assert_eq!(stored.title.as_deref(), Some("Wire Story"));
        assert!(stored.error.is_none());
        assert!(stored.word_count > 0);
    }
}
