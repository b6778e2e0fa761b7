//! Kafka pageview publisher for the shop-loadgen CDC demo.
//!
//! Pageviews are the stream half of the demo's dual write: the load generator
//! publishes them here while purchases go to MySQL. Downstream consumers join
//! the two on user and product.
//!
//! ```rust,ignore
//! use pageview_kafka::PageviewPublisher;
//! use shop_generator::Pageview;
//!
//! let publisher = PageviewPublisher::new("127.0.0.1:9092", "pageview")?;
//! publisher.create_topic(3).await?;
//! publisher
//!     .publish(&Pageview::new(1, 42, "social", chrono::Utc::now().timestamp()))
//!     .await?;
//! ```

pub mod args;
pub mod error;
pub mod publisher;

// Re-exports for convenience
pub use args::KafkaArgs;
pub use error::PageviewPublishError;
pub use publisher::{PageviewPublisher, DEFAULT_DELIVERY_TIMEOUT};
