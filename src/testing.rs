//! In-memory implementations of the pipeline seams.
//!
//! These let the whole provision → seed → generate flow run in tests without
//! MySQL, Kafka or real sleeps. Stores and sinks can share an [`EventLog`] to
//! check the order of side effects across both systems.

use crate::sink::{Pacer, PageviewSink, ShopStore};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use shop_generator::{ItemPrice, NewItem, NewPurchase, NewUser, Pageview};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Error returned by the in-memory fakes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// One side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Pageview(Pageview),
    Purchase(StoredPurchase),
}

/// Shared, ordered record of side effects.
pub type EventLog = Arc<Mutex<Vec<Recorded>>>;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: u64,
    pub item: NewItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub id: u64,
    pub user: NewUser,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPurchase {
    pub id: u64,
    pub purchase: NewPurchase,
}

/// Shop tables held in memory, with auto-increment ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryShop {
    pub items: Vec<StoredItem>,
    pub users: Vec<StoredUser>,
    pub purchases: Vec<StoredPurchase>,
    pub provision_count: u32,
    next_item_id: u64,
    next_user_id: u64,
    next_purchase_id: u64,
    fail_purchase_at: Option<u64>,
    fail_seeding: bool,
    user_id_step: u64,
    log: Option<EventLog>,
}

impl InMemoryShop {
    pub fn new() -> Self {
        Self {
            user_id_step: 1,
            ..Default::default()
        }
    }

    /// Assign user ids 1, 1 + step, 1 + 2 * step, ... like a server with
    /// `auto_increment_increment = step`.
    pub fn with_user_id_step(mut self, step: u64) -> Self {
        self.user_id_step = step.max(1);
        self
    }

    /// Record committed purchases into `log`.
    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Fail the `n`th purchase insert (1-based).
    pub fn fail_purchase_at(mut self, n: u64) -> Self {
        self.fail_purchase_at = Some(n);
        self
    }

    /// Fail every seeding insert.
    pub fn fail_seeding(mut self) -> Self {
        self.fail_seeding = true;
        self
    }

    pub fn item_price(&self, id: u64) -> Option<&StoredItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

#[async_trait]
impl ShopStore for InMemoryShop {
    type Error = FakeError;

    async fn provision(&mut self) -> Result<(), Self::Error> {
        self.items.clear();
        self.users.clear();
        self.purchases.clear();
        self.next_item_id = 0;
        self.next_user_id = 0;
        self.next_purchase_id = 0;
        self.provision_count += 1;
        Ok(())
    }

    async fn insert_items(&mut self, items: &[NewItem]) -> Result<u64, Self::Error> {
        if self.fail_seeding {
            return Err(FakeError("items table is read-only".to_string()));
        }
        for item in items {
            self.next_item_id += 1;
            self.items.push(StoredItem {
                id: self.next_item_id,
                item: item.clone(),
            });
        }
        Ok(items.len() as u64)
    }

    async fn insert_users(&mut self, users: &[NewUser]) -> Result<u64, Self::Error> {
        if self.fail_seeding {
            return Err(FakeError("users table is read-only".to_string()));
        }
        for user in users {
            self.next_user_id = if self.next_user_id == 0 {
                1
            } else {
                self.next_user_id + self.user_id_step.max(1)
            };
            self.users.push(StoredUser {
                id: self.next_user_id,
                user: user.clone(),
            });
        }
        Ok(users.len() as u64)
    }

    async fn load_item_prices(&mut self) -> Result<Vec<ItemPrice>, Self::Error> {
        Ok(self
            .items
            .iter()
            .map(|i| ItemPrice {
                id: i.id,
                price: i.item.price,
            })
            .collect())
    }

    async fn load_user_ids(&mut self) -> Result<Vec<u64>, Self::Error> {
        Ok(self.users.iter().map(|u| u.id).collect())
    }

    async fn insert_purchase(&mut self, purchase: &NewPurchase) -> Result<u64, Self::Error> {
        let attempt = self.purchases.len() as u64 + 1;
        if self.fail_purchase_at == Some(attempt) {
            return Err(FakeError(format!("purchase {attempt} rejected")));
        }
        if !self.users.iter().any(|u| u.id == purchase.user_id) {
            return Err(FakeError(format!("unknown user {}", purchase.user_id)));
        }
        if !self.items.iter().any(|i| i.id == purchase.item_id) {
            return Err(FakeError(format!("unknown item {}", purchase.item_id)));
        }

        self.next_purchase_id += 1;
        let stored = StoredPurchase {
            id: self.next_purchase_id,
            purchase: purchase.clone(),
        };
        if let Some(log) = &self.log {
            log.lock()
                .expect("event log poisoned")
                .push(Recorded::Purchase(stored.clone()));
        }
        self.purchases.push(stored);
        Ok(self.next_purchase_id)
    }
}

/// Sink that keeps every published pageview.
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Mutex<Vec<Pageview>>,
    attempts: Mutex<u64>,
    /// Attempts (1-based) that fail.
    failing_attempts: Vec<u64>,
    fail_always: bool,
    retriable: bool,
    log: Option<EventLog>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            retriable: true,
            ..Default::default()
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Fail the given publish attempts (1-based, counting retries).
    pub fn failing_attempts(mut self, attempts: impl IntoIterator<Item = u64>) -> Self {
        self.failing_attempts = attempts.into_iter().collect();
        self
    }

    /// Fail every attempt.
    pub fn always_failing(mut self) -> Self {
        self.fail_always = true;
        self
    }

    /// Report failures as not worth retrying.
    pub fn non_retriable(mut self) -> Self {
        self.retriable = false;
        self
    }

    pub fn published(&self) -> Vec<Pageview> {
        self.published.lock().expect("sink poisoned").clone()
    }

    pub fn attempts(&self) -> u64 {
        *self.attempts.lock().expect("sink poisoned")
    }
}

#[async_trait]
impl PageviewSink for RecordingSink {
    type Error = FakeError;

    async fn publish(&self, pageview: &Pageview) -> Result<(), Self::Error> {
        let attempt = {
            let mut attempts = self.attempts.lock().expect("sink poisoned");
            *attempts += 1;
            *attempts
        };
        if self.fail_always || self.failing_attempts.contains(&attempt) {
            return Err(FakeError(format!("broker unavailable (attempt {attempt})")));
        }

        self.published
            .lock()
            .expect("sink poisoned")
            .push(pageview.clone());
        if let Some(log) = &self.log {
            log.lock()
                .expect("event log poisoned")
                .push(Recorded::Pageview(pageview.clone()));
        }
        Ok(())
    }

    fn is_retriable(&self, _error: &Self::Error) -> bool {
        self.retriable
    }
}

/// Virtual clock that records pauses instead of sleeping.
#[derive(Debug)]
pub struct ManualPacer {
    state: Mutex<(DateTime<Utc>, Vec<Duration>)>,
}

impl ManualPacer {
    pub fn starting_at(epoch_secs: i64) -> Self {
        let start = Utc
            .timestamp_opt(epoch_secs, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            state: Mutex::new((start, Vec::new())),
        }
    }

    /// Every pause requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.state.lock().expect("pacer poisoned").1.clone()
    }
}

impl Default for ManualPacer {
    fn default() -> Self {
        Self::starting_at(1_700_000_000)
    }
}

#[async_trait]
impl Pacer for ManualPacer {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().expect("pacer poisoned").0
    }

    async fn pause(&self, duration: Duration) {
        let mut state = self.state.lock().expect("pacer poisoned");
        state.0 += chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        state.1.push(duration);
    }
}
