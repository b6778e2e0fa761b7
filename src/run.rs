//! Command runners wiring the pipeline to MySQL and Kafka.

use crate::args::GenerateArgs;
use crate::error::LoadgenError;
use crate::logging::mask_connection_password;
use crate::metrics::RunMetrics;
use crate::pipeline::{log_generation_plan, run_pipeline};
use crate::seed::provision_schema;
use crate::sink::TokioPacer;
use pageview_kafka::{KafkaArgs, PageviewPublisher};
use shop_generator::ShopGenerator;
use shop_populate_mysql::{MySQLArgs, MySQLShop};
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait for in-flight pageviews when the run ends.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Provision, seed and generate against live services.
///
/// Returns `None` for a dry run.
pub async fn run_loadgen(
    mysql: &MySQLArgs,
    kafka: &KafkaArgs,
    args: &GenerateArgs,
) -> Result<Option<RunMetrics>, LoadgenError> {
    let config = args.load_config()?;
    let seed = args.resolve_seed();
    let mut generator = ShopGenerator::new(config, seed)?;

    if args.dry_run {
        info!(
            "[DRY-RUN] Would provision database '{}' on {}",
            mysql.database,
            mask_connection_password(&mysql.mysql_connection_string)
        );
        info!(
            "[DRY-RUN] Would publish to topic '{}' on {}",
            generator.config().kafka_topic,
            kafka.kafka_brokers
        );
        log_generation_plan(&generator);
        info!("[DRY-RUN] Configuration validated successfully");
        return Ok(None);
    }

    info!(
        "Connecting to MySQL at {}",
        mask_connection_password(&mysql.mysql_connection_string)
    );
    let mut store = MySQLShop::connect(&mysql.mysql_connection_string, &mysql.database)
        .await
        .map_err(|e| LoadgenError::connect("MySQL", e))?
        .with_batch_size(generator.config().seed_batch_size);

    let publisher = PageviewPublisher::new(&kafka.kafka_brokers, &generator.config().kafka_topic)
        .map_err(|e| LoadgenError::connect("Kafka", e))?;
    publisher
        .create_topic(kafka.topic_partitions)
        .await
        .map_err(|e| LoadgenError::connect("Kafka", e))?;

    let result = run_pipeline(&mut generator, &mut store, &publisher, &TokioPacer).await;

    if let Err(e) = publisher.flush(FLUSH_TIMEOUT) {
        warn!("Failed to flush pending pageviews: {}", e);
    }
    if let Err(e) = store.disconnect().await {
        warn!("Failed to close MySQL connection cleanly: {}", e);
    }

    result.map(Some)
}

/// Drop and recreate the shop schema, nothing else.
pub async fn run_provision(mysql: &MySQLArgs) -> Result<(), LoadgenError> {
    info!(
        "Connecting to MySQL at {}",
        mask_connection_password(&mysql.mysql_connection_string)
    );
    let mut store = MySQLShop::connect(&mysql.mysql_connection_string, &mysql.database)
        .await
        .map_err(|e| LoadgenError::connect("MySQL", e))?;

    provision_schema(&mut store).await?;
    info!("Database '{}' is ready for a new run", store.database());

    if let Err(e) = store.disconnect().await {
        warn!("Failed to close MySQL connection cleanly: {}", e);
    }
    Ok(())
}

/// The effective configuration as YAML, after file and CLI overrides.
pub fn render_config(args: &GenerateArgs) -> Result<String, LoadgenError> {
    let config = args.load_config()?;
    Ok(config.to_yaml()?)
}
