//! In-memory order store for tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use optrack_core::{MutateFn, OrderStore, SavedOrder, StoreError, StoreEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::StoreDoc;

pub struct MemoryOrderStore {
    inner: Mutex<StoreDoc>,
    tx: broadcast::Sender<StoreEvent>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            inner: Mutex::new(StoreDoc::default()),
            tx,
        }
    }

    /// Pre-seed the store, bypassing notifications. Test convenience.
    pub fn with_orders(orders: Vec<SavedOrder>) -> Self {
        let store = Self::new();
        store.inner.lock().orders = orders;
        store
    }

    fn notify(&self) {
        // No receivers is fine; UI subscription is optional.
        let _ = self.tx.send(StoreEvent::Changed);
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn load(&self) -> Result<Vec<SavedOrder>, StoreError> {
        Ok(self.inner.lock().orders.clone())
    }

    async fn append(&self, order: SavedOrder) -> Result<(), StoreError> {
        self.inner.lock().orders.push(order);
        self.notify();
        Ok(())
    }

    async fn update(&self, id: &str, mutate: MutateFn) -> Result<SavedOrder, StoreError> {
        let updated = {
            let mut doc = self.inner.lock();
            let order = doc
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            mutate(order);
            order.clone()
        };
        self.notify();
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        {
            let mut doc = self.inner.lock();
            let before = doc.orders.len();
            doc.orders.retain(|o| o.id != id);
            if doc.orders.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        self.notify();
        Ok(())
    }

    async fn load_heartbeat(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().heartbeat)
    }

    async fn save_heartbeat(&self, ts: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.lock().heartbeat = Some(ts);
        self.notify();
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}
