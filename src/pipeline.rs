//! Provision, seed, generate.

use crate::error::LoadgenError;
use crate::generate::EventGenerator;
use crate::metrics::RunMetrics;
use crate::seed::{provision_schema, seed_reference_data};
use crate::sink::{Pacer, PageviewSink, ShopStore};
use shop_generator::ShopGenerator;
use std::time::Instant;
use tracing::info;

/// Run the whole load generator against the given store, sink and pacer.
///
/// Provisioning and seeding errors are fatal. Generation errors follow the
/// policy documented on [`crate::generate`].
pub async fn run_pipeline<S, K, C>(
    generator: &mut ShopGenerator,
    store: &mut S,
    sink: &K,
    pacer: &C,
) -> Result<RunMetrics, LoadgenError>
where
    S: ShopStore,
    K: PageviewSink,
    C: Pacer,
{
    let seed_started = Instant::now();
    provision_schema(store).await?;
    let report = seed_reference_data(generator, store).await?;
    let seed_duration = seed_started.elapsed();

    log_generation_plan(generator);

    let mut metrics = EventGenerator::new(generator, &report.snapshot, store, sink, pacer)
        .run()
        .await?;
    metrics.items_seeded = report.items_seeded;
    metrics.users_seeded = report.users_seeded;
    metrics.seed_duration = seed_duration;

    info!(
        "Done generating purchases: {} purchases, {} pageviews published ({} skipped, {} retries) in {:?} ({:.2} purchases/sec)",
        metrics.purchases_written,
        metrics.pageviews_published,
        metrics.pageviews_skipped,
        metrics.publish_retries,
        metrics.generation_duration,
        metrics.purchases_per_second()
    );

    Ok(metrics)
}

/// Tell the operator how fast data will change and how long the loop runs.
pub fn log_generation_plan(generator: &ShopGenerator) {
    let config = generator.config();
    info!(
        "Generating {} purchases ({:.1}/s for {:.1}m) and {} pageviews ({} per purchase), seed {}",
        config.purchase_gen_count,
        config.purchases_per_second(),
        config.expected_generation_time().as_secs_f64() / 60.0,
        config.expected_pageviews(),
        1 + config.noise_pageviews_per_purchase,
        generator.seed()
    );
}
