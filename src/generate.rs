//! The purchase and pageview generation loop.
//!
//! Each iteration:
//!
//! 1. samples an item and a user from the seed snapshot, and a quantity
//! 2. publishes the purchaser's pageview of that item
//! 3. publishes `noisePageviewsPerPurchase` pageviews with independently
//!    sampled users and items
//! 4. inserts and commits the purchase at `quantity * unit price`
//! 5. pauses for `purchaseGenEveryMS` unless it was the last iteration
//!
//! The stream and the database are written independently. A crash between
//! steps 2 and 4 leaves pageviews without a purchase, which downstream
//! consumers see as ordinary unconverted traffic.
//!
//! Purchase write failures always end the run. Publish failures are retried
//! with exponential backoff and then handled by `onPublishFailure`.

use crate::error::LoadgenError;
use crate::metrics::RunMetrics;
use crate::seed::SeedSnapshot;
use crate::sink::{Pacer, PageviewSink, ShopStore};
use shop_generator::{Pageview, PublishFailurePolicy, ShopGenerator};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Log a progress line every this many purchases.
const PROGRESS_EVERY: u64 = 100;

/// Backoff exponent cap: delays stop growing at 16x the base.
const MAX_BACKOFF_SHIFT: u32 = 4;

/// Delay before retry number `attempt` (1-based).
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base * (1u32 << attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT))
}

/// Drives the generation loop against a store, a sink and a pacer.
pub struct EventGenerator<'a, S, K, C> {
    generator: &'a mut ShopGenerator,
    snapshot: &'a SeedSnapshot,
    store: &'a mut S,
    sink: &'a K,
    pacer: &'a C,
    metrics: RunMetrics,
}

impl<'a, S, K, C> EventGenerator<'a, S, K, C>
where
    S: ShopStore,
    K: PageviewSink,
    C: Pacer,
{
    pub fn new(
        generator: &'a mut ShopGenerator,
        snapshot: &'a SeedSnapshot,
        store: &'a mut S,
        sink: &'a K,
        pacer: &'a C,
    ) -> Self {
        Self {
            generator,
            snapshot,
            store,
            sink,
            pacer,
            metrics: RunMetrics::default(),
        }
    }

    /// Run `purchaseGenCount` iterations.
    ///
    /// Only the generation counters of the returned metrics are filled in.
    pub async fn run(mut self) -> Result<RunMetrics, LoadgenError> {
        let count = self.generator.config().purchase_gen_count;
        if count == 0 {
            return Ok(self.metrics);
        }
        if self.snapshot.items.is_empty() {
            return Err(LoadgenError::EmptySeed("items"));
        }
        if self.snapshot.user_ids.is_empty() {
            return Err(LoadgenError::EmptySeed("users"));
        }

        let interval = self.generator.config().pacing_interval();
        let started = Instant::now();

        for iteration in 1..=count {
            self.run_iteration(iteration).await?;

            if iteration % PROGRESS_EVERY == 0 {
                info!(
                    "Generated {}/{} purchases ({} pageviews published, {} skipped)",
                    iteration,
                    count,
                    self.metrics.pageviews_published,
                    self.metrics.pageviews_skipped
                );
            }

            if iteration < count {
                self.pacer.pause(interval).await;
            }
        }

        self.metrics.generation_duration = started.elapsed();
        Ok(self.metrics)
    }

    async fn run_iteration(&mut self, iteration: u64) -> Result<(), LoadgenError> {
        let snapshot: &'a SeedSnapshot = self.snapshot;
        let items = &snapshot.items;
        let user_ids = &snapshot.user_ids;

        let purchase = self.generator.sample_purchase(items, user_ids)?;

        let pageview = self.generator.pageview(
            purchase.user_id,
            purchase.item_id,
            self.pacer.now().timestamp(),
        );
        self.publish(iteration, &pageview).await?;

        for _ in 0..self.generator.config().noise_pageviews_per_purchase {
            let received_at = self.pacer.now().timestamp();
            let noise = self
                .generator
                .noise_pageview(items, user_ids, received_at)?;
            self.publish(iteration, &noise).await?;
        }

        let purchase_id = self
            .store
            .insert_purchase(&purchase)
            .await
            .map_err(|e| LoadgenError::Storage {
                iteration,
                source: Box::new(e),
            })?;
        self.metrics.purchases_written += 1;

        debug!(
            "Purchase {} committed: user {} bought {} x item {} for {}",
            purchase_id,
            purchase.user_id,
            purchase.quantity,
            purchase.item_id,
            purchase.purchase_price
        );
        Ok(())
    }

    /// Publish with bounded retries, then apply the failure policy.
    async fn publish(&mut self, iteration: u64, pageview: &Pageview) -> Result<(), LoadgenError> {
        let config = self.generator.config();
        let max_retries = config.publish_max_retries;
        let base = Duration::from_millis(config.publish_retry_base_ms);
        let policy = config.on_publish_failure;

        let mut attempt = 0u32;
        loop {
            let err = match self.sink.publish(pageview).await {
                Ok(()) => {
                    self.metrics.pageviews_published += 1;
                    return Ok(());
                }
                Err(err) => err,
            };

            if attempt < max_retries && self.sink.is_retriable(&err) {
                attempt += 1;
                self.metrics.publish_retries += 1;
                let delay = retry_delay(base, attempt);
                warn!(
                    "Retrying pageview publish in iteration {} (attempt {}/{}), waiting {:?}: {}",
                    iteration, attempt, max_retries, delay, err
                );
                self.pacer.pause(delay).await;
                continue;
            }

            return match policy {
                PublishFailurePolicy::Abort => Err(LoadgenError::Publish {
                    iteration,
                    attempts: attempt + 1,
                    source: Box::new(err),
                }),
                PublishFailurePolicy::Skip => {
                    self.metrics.pageviews_skipped += 1;
                    warn!(
                        "Skipping pageview {} for user {} in iteration {}: {}",
                        pageview.url, pageview.user_id, iteration, err
                    );
                    Ok(())
                }
            };
        }
    }
}
