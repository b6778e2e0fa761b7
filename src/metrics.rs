//! Counters collected over a run.

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Metrics from a load generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Items inserted while seeding.
    pub items_seeded: u64,
    /// Users inserted while seeding.
    pub users_seeded: u64,
    /// Purchases inserted and committed.
    pub purchases_written: u64,
    /// Pageviews acknowledged by the stream.
    pub pageviews_published: u64,
    /// Pageviews dropped after exhausting retries.
    pub pageviews_skipped: u64,
    /// Publish attempts beyond the first.
    pub publish_retries: u64,
    /// Time spent provisioning and seeding.
    #[serde(rename = "seed_duration_ms", serialize_with = "as_millis")]
    pub seed_duration: Duration,
    /// Time spent in the generation loop, pauses included.
    #[serde(rename = "generation_duration_ms", serialize_with = "as_millis")]
    pub generation_duration: Duration,
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl RunMetrics {
    /// Calculate purchases per second over the generation loop.
    pub fn purchases_per_second(&self) -> f64 {
        if self.generation_duration.as_secs_f64() > 0.0 {
            self.purchases_written as f64 / self.generation_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.seed_duration + self.generation_duration
    }
}
