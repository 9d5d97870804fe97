//! Capability traits implemented by providers and stores.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::chain::OptionChainData;
use crate::error::{ProviderError, StoreError};
use crate::order::SavedOrder;

/// Payload-free change notification; listeners reload from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Changed,
}

/// Boxed per-record mutation applied atomically under the store's lock.
pub type MutateFn = Box<dyn FnOnce(&mut SavedOrder) + Send>;

/// A delayed market data source.
///
/// Concrete HTTP clients (Tradier, Finnhub, Polygon, ...) live outside this
/// workspace; the monitor and CLI only see this trait.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_delayed_price(&self, symbol: &str) -> Result<Decimal, ProviderError>;

    async fn fetch_option_chain(
        &self,
        symbol: &str,
        expiration: Option<NaiveDate>,
    ) -> Result<OptionChainData, ProviderError>;
}

/// Authoritative holder of order records and the monitor heartbeat.
///
/// `update` must serialize concurrent mutations to the same id so a
/// user-initiated cancel and a monitor fill cannot interleave.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load(&self) -> Result<Vec<SavedOrder>, StoreError>;

    async fn append(&self, order: SavedOrder) -> Result<(), StoreError>;

    /// Atomic read-modify-write of one record; returns the updated record.
    async fn update(&self, id: &str, mutate: MutateFn) -> Result<SavedOrder, StoreError>;

    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    async fn load_heartbeat(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn save_heartbeat(&self, ts: DateTime<Utc>) -> Result<(), StoreError>;

    /// Store-changed notifications, emitted after any mutation.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
