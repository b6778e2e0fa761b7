//! Schema provisioning and reference data seeding.

use crate::error::LoadgenError;
use crate::sink::ShopStore;
use shop_generator::{ItemPrice, ShopGenerator};
use tracing::info;

/// What the generation loop samples from, read back right after seeding.
///
/// Items are never deleted and prices never change during a run, so the
/// snapshot stays valid until the process exits.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSnapshot {
    pub items: Vec<ItemPrice>,
    pub user_ids: Vec<u64>,
}

/// Result of seeding: row counts plus the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub items_seeded: u64,
    pub users_seeded: u64,
    pub snapshot: SeedSnapshot,
}

/// Reset the shop schema to empty tables.
pub async fn provision_schema<S: ShopStore>(store: &mut S) -> Result<(), LoadgenError> {
    store
        .provision()
        .await
        .map_err(|e| LoadgenError::Provision(Box::new(e)))?;
    info!("Shop schema provisioned");
    Ok(())
}

/// Generate and insert the configured items and users, then snapshot them.
pub async fn seed_reference_data<S: ShopStore>(
    generator: &mut ShopGenerator,
    store: &mut S,
) -> Result<SeedReport, LoadgenError> {
    let seed_error = |entity: &'static str| {
        move |e: S::Error| LoadgenError::Seed {
            entity,
            source: Box::new(e),
        }
    };

    info!("Seeding {} shop items...", generator.config().item_seed_count);
    let items = generator.seed_items();
    let items_seeded = store
        .insert_items(&items)
        .await
        .map_err(seed_error("items"))?;

    info!("Seeding {} users...", generator.config().user_seed_count);
    let users = generator.seed_users();
    let users_seeded = store
        .insert_users(&users)
        .await
        .map_err(seed_error("users"))?;

    info!("Getting shop items...");
    let items = store
        .load_item_prices()
        .await
        .map_err(seed_error("item prices"))?;
    let user_ids = store
        .load_user_ids()
        .await
        .map_err(seed_error("user ids"))?;
    info!("Loaded {} items and {} users", items.len(), user_ids.len());

    Ok(SeedReport {
        items_seeded,
        users_seeded,
        snapshot: SeedSnapshot { items, user_ids },
    })
}

