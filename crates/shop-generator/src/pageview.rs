//! Pageview records published to the stream.

use serde::{Deserialize, Serialize};

/// A simulated visit to a product page.
///
/// Pageviews only exist as stream messages; nothing stores them relationally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageview {
    pub user_id: u64,
    pub url: String,
    pub channel: String,
    /// Epoch seconds.
    pub received_at: i64,
}

impl Pageview {
    pub fn new(user_id: u64, product_id: u64, channel: impl Into<String>, received_at: i64) -> Self {
        Self {
            user_id,
            url: product_url(product_id),
            channel: channel.into(),
            received_at,
        }
    }

    /// Product id parsed back out of the url.
    pub fn product_id(&self) -> Option<u64> {
        self.url.strip_prefix("/products/")?.parse().ok()
    }

    /// JSON payload for the message value.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Message key. Keying by user keeps one user's views on one partition.
    pub fn message_key(&self) -> String {
        self.user_id.to_string()
    }
}

pub fn product_url(product_id: u64) -> String {
    format!("/products/{product_id}")
}
