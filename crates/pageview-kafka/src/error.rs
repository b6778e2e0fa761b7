//! Error types for the pageview publisher.

use thiserror::Error;

/// Errors that can occur while publishing pageviews.
#[derive(Error, Debug)]
pub enum PageviewPublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Failed to encode pageview: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

impl PageviewPublishError {
    /// Whether trying the same publish again can succeed.
    ///
    /// Broker-side failures (timeouts, unavailable brokers, full queues) are
    /// transient; an unencodable payload never is.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, PageviewPublishError::Encode(_))
    }
}
