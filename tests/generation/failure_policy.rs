use crate::{small_config, SEED};
use shop_generator::{LoadgenConfig, PublishFailurePolicy, ShopGenerator};
use shop_loadgen::testing::{InMemoryShop, ManualPacer, RecordingSink};
use shop_loadgen::{run_pipeline, LoadgenError};
use std::time::Duration;

#[tokio::test]
async fn test_transient_publish_failure_is_retried() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    // First two attempts of the very first pageview fail
    let sink = RecordingSink::new().failing_attempts([1, 2]);
    let pacer = ManualPacer::default();

    let metrics = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(metrics.publish_retries, 2);
    assert_eq!(metrics.pageviews_published, 9);
    assert_eq!(sink.attempts(), 11);
    assert_eq!(store.purchases.len(), 3);

    let pauses = pacer.pauses();
    assert_eq!(&pauses[0..2], &[Duration::from_millis(50), Duration::from_millis(100)]);
}

#[tokio::test]
async fn test_exhausted_retries_abort_by_default() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new().always_failing();
    let pacer = ManualPacer::default();

    let err = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LoadgenError::Publish {
            iteration: 1,
            attempts: 4,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 8);
    assert_eq!(sink.attempts(), 4);
    assert!(store.purchases.is_empty());
}

#[tokio::test]
async fn test_skip_policy_keeps_generating() {
    let config = LoadgenConfig {
        on_publish_failure: PublishFailurePolicy::Skip,
        publish_max_retries: 1,
        ..small_config()
    };
    let mut generator = ShopGenerator::new(config, SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new().always_failing();
    let pacer = ManualPacer::default();

    let metrics = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(store.purchases.len(), 3);
    assert_eq!(metrics.purchases_written, 3);
    assert_eq!(metrics.pageviews_published, 0);
    assert_eq!(metrics.pageviews_skipped, 9);
    assert_eq!(metrics.publish_retries, 9);
    assert_eq!(sink.attempts(), 18);
}

#[tokio::test]
async fn test_non_retriable_failure_is_not_retried() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new().always_failing().non_retriable();
    let pacer = ManualPacer::default();

    let err = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadgenError::Publish { attempts: 1, .. }));
    assert_eq!(sink.attempts(), 1);
    assert!(pacer.pauses().is_empty());
}

#[tokio::test]
async fn test_storage_failure_aborts_run() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new().fail_purchase_at(2);
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    let err = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadgenError::Storage { iteration: 2, .. }));
    assert_eq!(err.exit_code(), 7);
    assert_eq!(store.purchases.len(), 1);
    // Pageviews of the failed iteration were already published
    assert_eq!(sink.published().len(), 6);
}

#[tokio::test]
async fn test_seeding_failure_is_fatal() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new().fail_seeding();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    let err = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadgenError::Seed { entity: "items", .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(sink.published().is_empty());
}
