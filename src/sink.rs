//! Seams between the load generator and the outside world.
//!
//! The pipeline only talks to storage through [`ShopStore`], to the stream
//! through [`PageviewSink`], and to time through [`Pacer`]. The MySQL store,
//! the Kafka publisher and tokio's clock implement them for real runs;
//! [`crate::testing`] has in-memory versions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pageview_kafka::{PageviewPublishError, PageviewPublisher};
use shop_generator::{ItemPrice, NewItem, NewPurchase, NewUser, Pageview};
use shop_populate_mysql::{MySQLShop, MySQLShopError};
use std::time::Duration;

/// Relational storage for the shop schema.
#[async_trait]
pub trait ShopStore: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Drop and recreate the schema, discarding all rows.
    async fn provision(&mut self) -> Result<(), Self::Error>;

    async fn insert_items(&mut self, items: &[NewItem]) -> Result<u64, Self::Error>;

    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, Self::Error>;

    /// Every stored item's id and unit price.
    async fn load_item_prices(&mut self) -> Result<Vec<ItemPrice>, Self::Error>;

    /// Every stored user id. Ids may have gaps.
    async fn load_user_ids(&mut self) -> Result<Vec<u64>, Self::Error>;

    /// Insert and commit one purchase, returning the assigned id.
    async fn insert_purchase(&mut self, purchase: &NewPurchase) -> Result<u64, Self::Error>;
}

/// Publish-only destination for pageviews.
#[async_trait]
pub trait PageviewSink: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn publish(&self, pageview: &Pageview) -> Result<(), Self::Error>;

    /// Whether a failed publish is worth retrying.
    fn is_retriable(&self, _error: &Self::Error) -> bool {
        true
    }
}

/// Clock and sleeper for the generation loop.
#[async_trait]
pub trait Pacer: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn pause(&self, duration: Duration);
}

/// Real time: `Utc::now` and `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl ShopStore for MySQLShop {
    type Error = MySQLShopError;

    async fn provision(&mut self) -> Result<(), Self::Error> {
        MySQLShop::provision(self).await
    }

    async fn insert_items(&mut self, items: &[NewItem]) -> Result<u64, Self::Error> {
        MySQLShop::insert_items(self, items).await
    }

    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, Self::Error> {
        MySQLShop::insert_users(self, users).await
    }

    async fn load_item_prices(&mut self) -> Result<Vec<ItemPrice>, Self::Error> {
        MySQLShop::load_item_prices(self).await
    }

    async fn load_user_ids(&mut self) -> Result<Vec<u64>, Self::Error> {
        MySQLShop::load_user_ids(self).await
    }

    async fn insert_purchase(&mut self, purchase: &NewPurchase) -> Result<u64, Self::Error> {
        MySQLShop::insert_purchase(self, purchase).await
    }
}

#[async_trait]
impl PageviewSink for PageviewPublisher {
    type Error = PageviewPublishError;

    async fn publish(&self, pageview: &Pageview) -> Result<(), Self::Error> {
        PageviewPublisher::publish(self, pageview).await
    }

    fn is_retriable(&self, error: &Self::Error) -> bool {
        error.is_retriable()
    }
}
