use crate::{small_config, SEED};
use shop_generator::ShopGenerator;
use shop_loadgen::testing::{InMemoryShop, ManualPacer, RecordingSink};
use shop_loadgen::{provision_schema, run_pipeline, seed_reference_data, ShopStore};

#[tokio::test]
async fn test_provisioning_twice_yields_empty_schema() {
    let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
    let mut store = InMemoryShop::new();
    let sink = RecordingSink::new();
    let pacer = ManualPacer::default();

    run_pipeline(&mut generator, &mut store, &sink, &pacer)
        .await
        .unwrap();
    assert!(!store.purchases.is_empty());

    provision_schema(&mut store).await.unwrap();
    provision_schema(&mut store).await.unwrap();

    assert!(store.items.is_empty());
    assert!(store.users.is_empty());
    assert!(store.purchases.is_empty());
    assert!(store.load_user_ids().await.unwrap().is_empty());
    assert_eq!(store.provision_count, 3);
}

#[tokio::test]
async fn test_rerun_after_provision_restarts_ids() {
    let mut store = InMemoryShop::new();

    for _ in 0..2 {
        let mut generator = ShopGenerator::new(small_config(), SEED).unwrap();
        provision_schema(&mut store).await.unwrap();
        let report = seed_reference_data(&mut generator, &mut store).await.unwrap();

        assert_eq!(report.items_seeded, 5);
        assert_eq!(report.users_seeded, 10);
        assert_eq!(report.snapshot.user_ids, (1..=10).collect::<Vec<u64>>());
        assert_eq!(
            report.snapshot.items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }
}
