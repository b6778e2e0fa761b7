//! CLI argument definitions for the Kafka side of the load generator.

use clap::Args;

/// Kafka connection arguments.
#[derive(Args, Clone, Debug)]
pub struct KafkaArgs {
    /// Kafka brokers (comma-separated, e.g., "127.0.0.1:9092")
    #[arg(long, env = "KAFKA_BROKERS", default_value = "127.0.0.1:9092")]
    pub kafka_brokers: String,

    /// Partitions used when the pageview topic has to be created
    #[arg(long, default_value = "3")]
    pub topic_partitions: i32,
}
