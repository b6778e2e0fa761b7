use crate::{small_config, SEED};
use rust_decimal::Decimal;
use shop_generator::{LoadgenConfig, ShopGenerator};
use shop_loadgen::testing::{EventLog, InMemoryShop, ManualPacer, RecordingSink, Recorded};
use shop_loadgen::run_pipeline;
use std::time::Duration;

#[tokio::test]
async fn test_small_run_counts_and_ranges() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    let metrics = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(store.purchases.len(), 3);
    assert_eq!(sink.published().len(), 9);
    assert_eq!(metrics.purchases_written, 3);
    assert_eq!(metrics.pageviews_published, 9);
    assert_eq!(metrics.pageviews_skipped, 0);
    assert_eq!(metrics.items_seeded, 5);
    assert_eq!(metrics.users_seeded, 10);

    for stored in &store.purchases {
        let purchase = &stored.purchase;
        assert!((1..=5).contains(&purchase.item_id));
        assert!((1..=10).contains(&purchase.user_id));
        assert!((1..=5).contains(&purchase.quantity));
    }

    for pageview in sink.published() {
        assert!((1..=10).contains(&pageview.user_id));
        assert!((1..=5).contains(&pageview.product_id().unwrap()));
        assert!(LoadgenConfig::default().channels.contains(&pageview.channel));
    }
}

#[tokio::test]
async fn test_sparse_user_ids_only_reference_existing_users() {
    let config = LoadgenConfig {
        purchase_gen_count: 100,
        ..small_config()
    };
    let mut generator = ShopGenerator::new(config, SEED).unwrap();
    // Ids 1, 3, ..., 19
    let mut store = InMemoryShop::new().with_user_id_step(2);
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    let metrics = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    let user_ids: Vec<u64> = store.users.iter().map(|u| u.id).collect();
    assert_eq!(user_ids, (1..=19).step_by(2).collect::<Vec<u64>>());
    assert_eq!(metrics.purchases_written, 100);
    assert!(store
        .purchases
        .iter()
        .all(|p| user_ids.contains(&p.purchase.user_id)));
    assert!(sink
        .published()
        .iter()
        .all(|p| user_ids.contains(&p.user_id)));
}

#[tokio::test]
async fn test_purchase_price_matches_seeded_item_price() {
    let config = LoadgenConfig {
        purchase_gen_count: 200,
        noise_pageviews_per_purchase: 0,
        ..small_config()
    };
    let mut generator = ShopGenerator::new(config, SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(store.purchases.len(), 200);
    for stored in &store.purchases {
        let purchase = &stored.purchase;
        let item = store.item_price(purchase.item_id).unwrap();
        assert_eq!(
            purchase.purchase_price,
            item.item.price * Decimal::from(purchase.quantity)
        );
    }
}

#[tokio::test]
async fn test_seeded_items_respect_configured_ranges() {
    let config = LoadgenConfig {
        item_seed_count: 300,
        purchase_gen_count: 0,
        ..small_config()
    };
    let mut generator = ShopGenerator::new(config.clone(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    let metrics = run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(metrics.purchases_written, 0);
    assert_eq!(store.items.len(), 300);
    for stored in &store.items {
        let item = &stored.item;
        assert!(item.price >= config.item_price_min && item.price <= config.item_price_max);
        assert_eq!(item.price.scale(), 2);
        assert!(
            (config.item_inventory_min..=config.item_inventory_max).contains(&item.daily_inventory)
        );
    }
}

#[tokio::test]
async fn test_degenerate_price_range_end_to_end() {
    let config = LoadgenConfig {
        item_price_min: Decimal::new(999, 2),
        item_price_max: Decimal::new(999, 2),
        ..small_config()
    };
    let mut generator = ShopGenerator::new(config, SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    assert!(store
        .items
        .iter()
        .all(|i| i.item.price == Decimal::new(999, 2)));
    for stored in &store.purchases {
        assert_eq!(
            stored.purchase.purchase_price,
            Decimal::new(999, 2) * Decimal::from(stored.purchase.quantity)
        );
    }
}

#[tokio::test]
async fn test_purchaser_pageview_comes_first_and_purchase_last() {
    let log = EventLog::default();
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new().with_log(log.clone());
    let sink = RecordingSink::new().with_log(log.clone());
    let pacer = ManualPacer::default();

    run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    let events = log.lock().unwrap().clone();
    assert_eq!(events.len(), 3 * (1 + 2 + 1));

    for iteration in events.chunks(4) {
        let Recorded::Purchase(stored) = &iteration[3] else {
            panic!("expected purchase last, got {:?}", iteration[3]);
        };
        let Recorded::Pageview(first) = &iteration[0] else {
            panic!("expected pageview first, got {:?}", iteration[0]);
        };
        assert_eq!(first.user_id, stored.purchase.user_id);
        assert_eq!(first.product_id(), Some(stored.purchase.item_id));
        assert!(matches!(iteration[1], Recorded::Pageview(_)));
        assert!(matches!(iteration[2], Recorded::Pageview(_)));
    }
}

#[tokio::test]
async fn test_pacing_between_iterations() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::starting_at(1_000);

    run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();

    // No pause after the final iteration
    assert_eq!(pacer.pauses(), vec![Duration::from_millis(100); 2]);

    let received: Vec<i64> = sink.published().iter().map(|p| p.received_at).collect();
    assert_eq!(&received[0..3], &[1_000, 1_000, 1_000]);
    assert_eq!(&received[6..9], &[1_000, 1_000, 1_000]);
}

#[tokio::test]
async fn test_same_seed_reproduces_run() {
    async fn run_once() -> (Vec<shop_loadgen::testing::StoredPurchase>, Vec<shop_generator::Pageview>) {
        let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
        let mut store = InMemoryShop::new();
        let sink = RecordingSink::new();
        let pacer = ManualPacer::default();
        run_pipeline(&mut generator, &mut store, &sink, &pacer)
            .await
            .unwrap();
        (store.purchases, sink.published())
    }

    assert_eq!(run_once().await, run_once().await);
}
