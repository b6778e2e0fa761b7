//! Load generator configuration.
//!
//! Every tunable of a run lives in [`LoadgenConfig`]. The struct is built once
//! (from defaults, a YAML file, or both) and handed to each component, which
//! only ever reads it.
//!
//! Keys use camelCase so the YAML file reads like the option names used in the
//! demo documentation:
//!
//! ```yaml
//! userSeedCount: 1000
//! itemSeedCount: 200
//! purchaseGenCount: 10000
//! purchaseGenEveryMS: 100
//! itemPriceMin: 5.00
//! itemPriceMax: 500.00
//! kafkaTopic: pageview
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// MySQL's limit on placeholders in one prepared statement.
pub const MAX_STATEMENT_PLACEHOLDERS: usize = 65_535;

/// Columns per seeded item or user row.
pub const SEED_ROW_COLUMNS: usize = 3;

/// Largest seed batch whose INSERT stays within [`MAX_STATEMENT_PLACEHOLDERS`].
pub const MAX_SEED_BATCH_SIZE: usize = MAX_STATEMENT_PLACEHOLDERS / SEED_ROW_COLUMNS;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML could not be parsed into a config
    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A field holds a value the generator cannot work with
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// What the event loop does with a pageview that still fails after retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishFailurePolicy {
    /// Stop the run with a publish error.
    #[default]
    Abort,
    /// Drop the pageview, count it, and keep generating.
    Skip,
}

/// Immutable configuration for a load generator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LoadgenConfig {
    pub user_seed_count: u64,
    pub item_seed_count: u64,
    pub purchase_gen_count: u64,
    #[serde(rename = "purchaseGenEveryMS")]
    pub purchase_gen_every_ms: u64,
    pub item_inventory_min: i32,
    pub item_inventory_max: i32,
    pub item_price_min: Decimal,
    pub item_price_max: Decimal,
    pub kafka_topic: String,
    pub channels: Vec<String>,
    /// Uncorrelated pageviews published after each purchaser's pageview.
    pub noise_pageviews_per_purchase: u32,
    pub purchase_quantity_max: u32,
    pub vip_probability: f64,
    /// Rows per multi-row INSERT statement while seeding.
    pub seed_batch_size: usize,
    pub publish_max_retries: u32,
    #[serde(rename = "publishRetryBaseMS")]
    pub publish_retry_base_ms: u64,
    pub on_publish_failure: PublishFailurePolicy,
}

impl Default for LoadgenConfig {
    fn default() -> Self {
        Self {
            user_seed_count: 1000,
            item_seed_count: 200,
            purchase_gen_count: 10000,
            purchase_gen_every_ms: 100,
            item_inventory_min: 10,
            item_inventory_max: 1000,
            item_price_min: Decimal::new(500, 2),
            item_price_max: Decimal::new(50000, 2),
            kafka_topic: "pageview".to_string(),
            channels: default_channels(),
            noise_pageviews_per_purchase: 10,
            purchase_quantity_max: 5,
            vip_probability: 0.1,
            seed_batch_size: 100,
            publish_max_retries: 3,
            publish_retry_base_ms: 100,
            on_publish_failure: PublishFailurePolicy::Abort,
        }
    }
}

fn default_channels() -> Vec<String> {
    ["organic search", "paid search", "referral", "social", "display"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl LoadgenConfig {
    /// Parse a config from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize back to YAML (used to log the effective config).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Delay between generation iterations.
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.purchase_gen_every_ms)
    }

    /// Purchases per second implied by the pacing interval, ignoring I/O time.
    pub fn purchases_per_second(&self) -> f64 {
        if self.purchase_gen_every_ms == 0 {
            return f64::INFINITY;
        }
        1000.0 / self.purchase_gen_every_ms as f64
    }

    /// Expected run length of the generation loop, ignoring I/O time.
    pub fn expected_generation_time(&self) -> Duration {
        Duration::from_millis(self.purchase_gen_count.saturating_mul(self.purchase_gen_every_ms))
    }

    /// Pageview messages a complete run publishes.
    pub fn expected_pageviews(&self) -> u64 {
        self.purchase_gen_count * (1 + self.noise_pageviews_per_purchase as u64)
    }

    /// Check that every range and option is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_inventory_min > self.item_inventory_max {
            return Err(ConfigError::invalid(
                "itemInventoryMin",
                format!(
                    "{} is greater than itemInventoryMax {}",
                    self.item_inventory_min, self.item_inventory_max
                ),
            ));
        }
        if self.item_inventory_min < 0 {
            return Err(ConfigError::invalid(
                "itemInventoryMin",
                "inventory cannot be negative",
            ));
        }

        for (field, price) in [
            ("itemPriceMin", self.item_price_min),
            ("itemPriceMax", self.item_price_max),
        ] {
            if price.is_sign_negative() {
                return Err(ConfigError::invalid(field, "price cannot be negative"));
            }
            if price.normalize().scale() > 2 {
                return Err(ConfigError::invalid(
                    field,
                    format!("{price} has more than two decimal places"),
                ));
            }
            // DECIMAL(7,2) column
            if price >= Decimal::new(100_000, 0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("{price} does not fit DECIMAL(7,2)"),
                ));
            }
        }
        if self.item_price_min > self.item_price_max {
            return Err(ConfigError::invalid(
                "itemPriceMin",
                format!(
                    "{} is greater than itemPriceMax {}",
                    self.item_price_min, self.item_price_max
                ),
            ));
        }

        if self.channels.is_empty() {
            return Err(ConfigError::invalid(
                "channels",
                "at least one channel is required",
            ));
        }
        if self.channels.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::invalid("channels", "channel names cannot be blank"));
        }
        if self.kafka_topic.trim().is_empty() {
            return Err(ConfigError::invalid("kafkaTopic", "topic name is empty"));
        }
        if self.purchase_quantity_max == 0 {
            return Err(ConfigError::invalid(
                "purchaseQuantityMax",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.vip_probability) {
            return Err(ConfigError::invalid(
                "vipProbability",
                format!("{} is outside [0, 1]", self.vip_probability),
            ));
        }
        if self.seed_batch_size == 0 {
            return Err(ConfigError::invalid("seedBatchSize", "must be at least 1"));
        }
        if self.seed_batch_size > MAX_SEED_BATCH_SIZE {
            return Err(ConfigError::invalid(
                "seedBatchSize",
                format!(
                    "{} rows exceed the {MAX_SEED_BATCH_SIZE}-row limit of one INSERT",
                    self.seed_batch_size
                ),
            ));
        }
        // purchase_price is DECIMAL(12,2)
        let max_purchase_price = Decimal::new(10_000_000_000, 0);
        let fits = self
            .item_price_max
            .checked_mul(Decimal::from(self.purchase_quantity_max))
            .is_some_and(|price| price < max_purchase_price);
        if !fits {
            return Err(ConfigError::invalid(
                "purchaseQuantityMax",
                format!(
                    "{} x itemPriceMax {} does not fit DECIMAL(12,2)",
                    self.purchase_quantity_max, self.item_price_max
                ),
            ));
        }
        if self.purchase_gen_count > 0 {
            if self.user_seed_count == 0 {
                return Err(ConfigError::invalid(
                    "userSeedCount",
                    "purchases need at least one seeded user",
                ));
            }
            if self.item_seed_count == 0 {
                return Err(ConfigError::invalid(
                    "itemSeedCount",
                    "purchases need at least one seeded item",
                ));
            }
        }

        Ok(())
    }
}
