//! Generation pipeline integration tests.
//!
//! These run provision -> seed -> generate against the in-memory store, sink
//! and pacer from `shop_loadgen::testing`, so they need no MySQL or Kafka.

mod commands;
mod end_to_end;
mod failure_policy;
mod provisioning;

use shop_generator::LoadgenConfig;

pub const SEED: u64 = 42;

/// Small run used by most tests: 10 users, 5 items, 3 purchases, 2 noise pageviews.
pub fn small_config() -> LoadgenConfig {
    LoadgenConfig {
        user_seed_count: 10,
        item_seed_count: 5,
        purchase_gen_count: 3,
        noise_pageviews_per_purchase: 2,
        purchase_gen_every_ms: 100,
        publish_retry_base_ms: 50,
        ..Default::default()
    }
}
