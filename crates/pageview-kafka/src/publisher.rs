//! Kafka publisher for pageview events.

use crate::error::PageviewPublishError;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use shop_generator::Pageview;
use std::time::Duration;
use tracing::{debug, info};

/// How long a single send may wait in the producer queue.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Publish-only client for the pageview topic.
///
/// Each pageview is published as a JSON value keyed by user id, and
/// [`publish`](Self::publish) returns only after the broker acknowledged it.
pub struct PageviewPublisher {
    producer: FutureProducer,
    brokers: String,
    topic: String,
}

/// Producer settings for `brokers`.
pub fn producer_config(brokers: &str) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers)
        .set("acks", "all")
        .set("message.timeout.ms", "30000")
        // Sends are awaited one at a time, so batching only adds latency
        .set("linger.ms", "0");
    config
}

impl PageviewPublisher {
    /// Create a publisher for `topic`.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (e.g., "127.0.0.1:9092")
    /// * `topic` - Topic every pageview is published to
    pub fn new(brokers: &str, topic: &str) -> Result<Self, PageviewPublishError> {
        let producer: FutureProducer = producer_config(brokers)
            .create()
            .map_err(PageviewPublishError::Kafka)?;

        Ok(Self {
            producer,
            brokers: brokers.to_string(),
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Create the topic if it doesn't exist.
    pub async fn create_topic(&self, partitions: i32) -> Result<(), PageviewPublishError> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(PageviewPublishError::Kafka)?;

        let new_topic = NewTopic::new(&self.topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| {
                PageviewPublishError::TopicCreation(format!("Failed to create topic: {e}"))
            })?;

        for result in results {
            match result {
                Ok(topic_name) => {
                    info!("Topic '{}' created successfully", topic_name);
                }
                Err((topic_name, err)) => {
                    let err_str = err.to_string();
                    if err_str.contains("already exists")
                        || err_str.contains("TopicExistsException")
                    {
                        info!("Topic '{}' already exists", topic_name);
                    } else {
                        return Err(PageviewPublishError::TopicCreation(format!(
                            "Failed to create topic {topic_name}: {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Publish one pageview and wait for its delivery report.
    pub async fn publish(&self, pageview: &Pageview) -> Result<(), PageviewPublishError> {
        let payload = pageview.to_json()?;
        let key = pageview.message_key();

        let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);
        match self.producer.send(record, DEFAULT_DELIVERY_TIMEOUT).await {
            Ok(_) => {
                debug!("Published pageview {} for user {}", pageview.url, key);
                Ok(())
            }
            Err((err, _)) => Err(PageviewPublishError::Kafka(err)),
        }
    }

    /// Wait for all queued messages to be delivered.
    pub fn flush(&self, timeout: Duration) -> Result<(), PageviewPublishError> {
        self.producer.flush(timeout)?;
        Ok(())
    }
}
