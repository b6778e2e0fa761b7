//! Row types produced by the generator.
//!
//! The `New*` types are rows that have not been stored yet; storage assigns
//! their ids. [`ItemPrice`] is the snapshot read back after seeding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Item row to insert into `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
    pub daily_inventory: i32,
}

/// User row to insert into `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub is_vip: bool,
}

/// An item's id and unit price as stored. Prices never change during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub id: u64,
    pub price: Decimal,
}

/// Purchase row to insert into `purchases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub user_id: u64,
    pub item_id: u64,
    pub quantity: u32,
    pub purchase_price: Decimal,
}

impl NewPurchase {
    /// Build a purchase for `quantity` units of `item`. The price is exact.
    pub fn for_item(user_id: u64, item: &ItemPrice, quantity: u32) -> Self {
        Self {
            user_id,
            item_id: item.id,
            quantity,
            purchase_price: item.price * Decimal::from(quantity),
        }
    }
}
