//! Error taxonomy for a load generator run.
//!
//! Every failure surfaces as one [`LoadgenError`] variant so the binary can
//! report which stage broke and exit with a matching status.
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 1 | any other error |
//! | 2 | command-line usage error (reported by clap) |
//! | 3 | invalid configuration |
//! | 4 | MySQL or Kafka connection failed |
//! | 5 | schema provisioning failed |
//! | 6 | seeding failed, or left nothing to sample |
//! | 7 | purchase write failed |
//! | 8 | pageview publish failed |

use shop_generator::{ConfigError, GeneratorError};
use thiserror::Error;

/// Boxed error from a store or sink implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LoadgenError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to {target}")]
    Connect {
        target: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Schema provisioning failed")]
    Provision(#[source] BoxError),

    #[error("Seeding {entity} failed")]
    Seed {
        entity: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Seeding left no {0} to sample purchases from")]
    EmptySeed(&'static str),

    #[error("Purchase write failed in iteration {iteration}")]
    Storage {
        iteration: u64,
        #[source]
        source: BoxError,
    },

    #[error("Pageview publish failed in iteration {iteration} after {attempts} attempt(s)")]
    Publish {
        iteration: u64,
        attempts: u32,
        #[source]
        source: BoxError,
    },
}

impl LoadgenError {
    /// Process exit status for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadgenError::Config(_) => 3,
            LoadgenError::Connect { .. } => 4,
            LoadgenError::Provision(_) => 5,
            LoadgenError::Seed { .. } | LoadgenError::EmptySeed(_) => 6,
            LoadgenError::Storage { .. } => 7,
            LoadgenError::Publish { .. } => 8,
        }
    }

    pub(crate) fn connect(
        target: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LoadgenError::Connect {
            target,
            source: Box::new(source),
        }
    }
}

/// Exit status for an error reaching `main`: the stage's code when the chain
/// holds a [`LoadgenError`], otherwise 1.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LoadgenError>()
        .map(LoadgenError::exit_code)
        .unwrap_or(1)
}

impl From<GeneratorError> for LoadgenError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Config(e) => LoadgenError::Config(e),
            GeneratorError::Empty(entity) => LoadgenError::EmptySeed(entity),
        }
    }
}
