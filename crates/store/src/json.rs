//! JSON-file backed order store.
//!
//! The whole document is rewritten on every mutation via a temp file and
//! rename, so a crash mid-write leaves the previous document intact. The
//! document is small (a retail order list), so full rewrites are fine.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use optrack_core::{MutateFn, OrderStore, SavedOrder, StoreError, StoreEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::StoreDoc;

#[derive(Debug)]
pub struct JsonOrderStore {
    path: PathBuf,
    inner: Mutex<StoreDoc>,
    tx: broadcast::Sender<StoreEvent>,
}

impl JsonOrderStore {
    /// Open a store at `path`, creating an empty document if none exists.
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?
        } else {
            StoreDoc::default()
        };
        debug!(path = %path.display(), orders = doc.orders.len(), "Opened order store");

        let (tx, _) = broadcast::channel(16);
        Ok(Self {
            path,
            inner: Mutex::new(doc),
            tx,
        })
    }

    /// Write the document under the lock, then notify listeners.
    fn persist_and_notify(&self, doc: &StoreDoc) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        let _ = self.tx.send(StoreEvent::Changed);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for JsonOrderStore {
    async fn load(&self) -> Result<Vec<SavedOrder>, StoreError> {
        Ok(self.inner.lock().orders.clone())
    }

    async fn append(&self, order: SavedOrder) -> Result<(), StoreError> {
        let mut doc = self.inner.lock();
        doc.orders.push(order);
        self.persist_and_notify(&doc)
    }

    async fn update(&self, id: &str, mutate: MutateFn) -> Result<SavedOrder, StoreError> {
        let mut doc = self.inner.lock();
        let order = doc
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        mutate(order);
        let updated = order.clone();
        self.persist_and_notify(&doc)?;
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut doc = self.inner.lock();
        let before = doc.orders.len();
        doc.orders.retain(|o| o.id != id);
        if doc.orders.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.persist_and_notify(&doc)
    }

    async fn load_heartbeat(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.inner.lock().heartbeat)
    }

    async fn save_heartbeat(&self, ts: DateTime<Utc>) -> Result<(), StoreError> {
        let mut doc = self.inner.lock();
        doc.heartbeat = Some(ts);
        self.persist_and_notify(&doc)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optrack_core::{OptionRight, OrderSide, OrderStatus, TimeInForce};
    use rust_decimal_macros::dec;

    fn sample_order() -> SavedOrder {
        SavedOrder::new_working(
            "MSFT",
            None,
            OptionRight::Put,
            dec!(400),
            OrderSide::Sell,
            1,
            Some(dec!(6.40)),
            TimeInForce::Day,
        )
    }

    #[tokio::test]
    async fn orders_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");

        let order = sample_order();
        {
            let store = JsonOrderStore::open(&path).unwrap();
            store.append(order.clone()).await.unwrap();
            store.save_heartbeat(Utc::now()).await.unwrap();
        }

        let reopened = JsonOrderStore::open(&path).unwrap();
        assert_eq!(reopened.load().await.unwrap(), vec![order]);
        assert!(reopened.load_heartbeat().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_persists_the_transition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let order = sample_order();

        let store = JsonOrderStore::open(&path).unwrap();
        store.append(order.clone()).await.unwrap();
        store
            .update(
                &order.id,
                Box::new(|o| {
                    o.status = OrderStatus::Filled;
                    o.fill_price = Some(dec!(6.40));
                    o.fill_quantity = Some(o.quantity);
                }),
            )
            .await
            .unwrap();
        drop(store);

        let reopened = JsonOrderStore::open(&path).unwrap();
        let orders = reopened.load().await.unwrap();
        assert_eq!(orders[0].status, OrderStatus::Filled);
        assert_eq!(orders[0].fill_price, Some(dec!(6.40)));
        assert_eq!(orders[0].fill_quantity, Some(1));
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonOrderStore::open(dir.path().join("orders.json")).unwrap();
        assert!(matches!(
            store.remove("missing").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn corrupt_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(matches!(
            JsonOrderStore::open(&path).unwrap_err(),
            StoreError::Corrupt(_)
        ));
    }
}
