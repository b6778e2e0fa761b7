//! Data generator for the shop-loadgen change-data-capture demo.
//!
//! This crate produces everything the load generator writes: seeded items and
//! users, purchases derived from the stored item prices, and the pageview
//! records published to the stream. A single seeded RNG drives all of it so a
//! run can be reproduced from its seed.
//!
//! # Architecture
//!
//! ```text
//!   LoadgenConfig
//!        │
//!        ▼
//! ┌─────────────────┐
//! │  ShopGenerator  │
//! │                 │
//! │  - config       │
//! │  - rng (StdRng) │
//! └────────┬────────┘
//!          │
//!          ├── NewItem / NewUser   (seeding)
//!          ├── NewPurchase         (per iteration)
//!          └── Pageview            (per iteration, 1 + noise)
//! ```
//!
//! # Example
//!
//! ```rust
//! use shop_generator::{ItemPrice, LoadgenConfig, ShopGenerator};
//!
//! let mut generator = ShopGenerator::new(LoadgenConfig::default(), 42).unwrap();
//! let item = generator.next_item();
//!
//! let snapshot = vec![ItemPrice { id: 1, price: item.price }];
//! let purchase = generator.sample_purchase(&snapshot, &[1, 2, 3]).unwrap();
//! assert_eq!(purchase.item_id, 1);
//! ```

pub mod config;
pub mod generator;
pub mod generators;
pub mod model;
pub mod pageview;

// Re-exports for convenience
pub use config::{
    ConfigError, LoadgenConfig, PublishFailurePolicy, MAX_SEED_BATCH_SIZE, SEED_ROW_COLUMNS,
};
pub use generator::{GeneratorError, ShopGenerator};
pub use model::{ItemPrice, NewItem, NewPurchase, NewUser};
pub use pageview::{product_url, Pageview};
