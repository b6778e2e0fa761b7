//! Generation arguments shared by the CLI commands.

use clap::Args;
use shop_generator::{ConfigError, LoadgenConfig};
use std::path::PathBuf;

/// Arguments that shape the generated data.
#[derive(Args, Clone, Debug, Default)]
pub struct GenerateArgs {
    /// Path to a YAML config file (missing keys keep their defaults)
    #[arg(long, short = 'c', env = "LOADGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Random seed for deterministic generation (random when omitted)
    #[arg(long, env = "LOADGEN_SEED")]
    pub seed: Option<u64>,

    /// Override purchaseGenCount
    #[arg(long)]
    pub purchase_gen_count: Option<u64>,

    /// Override purchaseGenEveryMS
    #[arg(long)]
    pub purchase_gen_every_ms: Option<u64>,

    /// Override noisePageviewsPerPurchase
    #[arg(long)]
    pub noise_pageviews: Option<u32>,

    /// Validate the configuration and log the plan without touching MySQL or Kafka
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Build the effective config: defaults, then the file, then CLI overrides.
    pub fn load_config(&self) -> Result<LoadgenConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => LoadgenConfig::from_file(path)?,
            None => LoadgenConfig::default(),
        };

        if let Some(count) = self.purchase_gen_count {
            config.purchase_gen_count = count;
        }
        if let Some(every_ms) = self.purchase_gen_every_ms {
            config.purchase_gen_every_ms = every_ms;
        }
        if let Some(noise) = self.noise_pageviews {
            config.noise_pageviews_per_purchase = noise;
        }

        config.validate()?;
        Ok(config)
    }

    /// The seed to use, drawing one from entropy if none was given.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
