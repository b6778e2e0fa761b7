//! Main data generator for producing shop rows and pageviews.

use crate::config::{ConfigError, LoadgenConfig};
use crate::generators::{
    generate_email, generate_int_range, generate_item_name, generate_price, generate_user_name,
};
use crate::model::{ItemPrice, NewItem, NewPurchase, NewUser};
use crate::pageview::Pageview;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::ops::RangeInclusive;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Nothing to sample from
    #[error("Cannot sample from an empty {0} set")]
    Empty(&'static str),
}

/// Data generator that produces deterministic shop data.
///
/// All randomness of a run flows through one seeded [`StdRng`], so two
/// generators built from the same config and seed produce the same items,
/// users, purchases and pageviews in the same order.
pub struct ShopGenerator {
    config: LoadgenConfig,
    rng: StdRng,
    seed: u64,
    price_cents: RangeInclusive<i64>,
}

impl ShopGenerator {
    /// Create a generator. The config is validated first.
    pub fn new(config: LoadgenConfig, seed: u64) -> Result<Self, GeneratorError> {
        config.validate()?;

        let min_cents = to_cents(config.item_price_min, "itemPriceMin")?;
        let max_cents = to_cents(config.item_price_max, "itemPriceMax")?;

        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
            price_cents: min_cents..=max_cents,
        })
    }

    pub fn config(&self) -> &LoadgenConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate one item.
    pub fn next_item(&mut self) -> NewItem {
        let name = generate_item_name(&mut self.rng);
        let price = generate_price(
            &mut self.rng,
            *self.price_cents.start(),
            *self.price_cents.end(),
        );
        let daily_inventory = generate_int_range(
            &mut self.rng,
            self.config.item_inventory_min,
            self.config.item_inventory_max,
        );

        NewItem {
            name,
            price,
            daily_inventory,
        }
    }

    /// Generate one user.
    pub fn next_user(&mut self) -> NewUser {
        let name = generate_user_name(&mut self.rng);
        let email = generate_email(&mut self.rng);
        let is_vip = self.rng.random_bool(self.config.vip_probability);

        NewUser {
            name,
            email,
            is_vip,
        }
    }

    /// Generate `itemSeedCount` items.
    pub fn seed_items(&mut self) -> Vec<NewItem> {
        (0..self.config.item_seed_count)
            .map(|_| self.next_item())
            .collect()
    }

    /// Generate `userSeedCount` users.
    pub fn seed_users(&mut self) -> Vec<NewUser> {
        (0..self.config.user_seed_count)
            .map(|_| self.next_user())
            .collect()
    }

    /// Pick an item uniformly from the price snapshot.
    pub fn sample_item<'a>(
        &mut self,
        items: &'a [ItemPrice],
    ) -> Result<&'a ItemPrice, GeneratorError> {
        if items.is_empty() {
            return Err(GeneratorError::Empty("item"));
        }
        Ok(&items[self.rng.random_range(0..items.len())])
    }

    /// Pick a user id uniformly from the stored ids.
    ///
    /// Ids are drawn from the list rather than a min..max range because
    /// auto-increment ids may have gaps.
    pub fn sample_user(&mut self, user_ids: &[u64]) -> Result<u64, GeneratorError> {
        if user_ids.is_empty() {
            return Err(GeneratorError::Empty("user"));
        }
        Ok(user_ids[self.rng.random_range(0..user_ids.len())])
    }

    /// Purchase quantity in `[1, purchaseQuantityMax]`.
    pub fn sample_quantity(&mut self) -> u32 {
        self.rng.random_range(1..=self.config.purchase_quantity_max)
    }

    /// Sample a complete purchase: item, user, then quantity.
    pub fn sample_purchase(
        &mut self,
        items: &[ItemPrice],
        user_ids: &[u64],
    ) -> Result<NewPurchase, GeneratorError> {
        let item = *self.sample_item(items)?;
        let user_id = self.sample_user(user_ids)?;
        let quantity = self.sample_quantity();
        Ok(NewPurchase::for_item(user_id, &item, quantity))
    }

    /// Build a pageview of `product_id` by `user_id` with a random channel.
    pub fn pageview(&mut self, user_id: u64, product_id: u64, received_at: i64) -> Pageview {
        let idx = self.rng.random_range(0..self.config.channels.len());
        Pageview::new(user_id, product_id, self.config.channels[idx].as_str(), received_at)
    }

    /// Build a background pageview with independently sampled user and item.
    pub fn noise_pageview(
        &mut self,
        items: &[ItemPrice],
        user_ids: &[u64],
        received_at: i64,
    ) -> Result<Pageview, GeneratorError> {
        let user_id = self.sample_user(user_ids)?;
        let item_id = self.sample_item(items)?.id;
        Ok(self.pageview(user_id, item_id, received_at))
    }
}

fn to_cents(price: Decimal, field: &'static str) -> Result<i64, ConfigError> {
    (price * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| ConfigError::Invalid {
            field,
            reason: format!("{price} cannot be expressed in cents"),
        })
}
