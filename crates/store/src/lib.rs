//! Order store backends.
//!
//! Both stores hold the full document (orders plus heartbeat) behind one
//! lock, so the per-id atomic `update` contract falls out of construction.
//! The on-disk JSON layout is an implementation detail, not a wire contract.

pub mod json;
pub mod memory;

pub use json::JsonOrderStore;
pub use memory::MemoryOrderStore;

use chrono::{DateTime, Utc};
use optrack_core::SavedOrder;
use serde::{Deserialize, Serialize};

/// The persisted document: every order ever appended plus the monitor
/// heartbeat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreDoc {
    pub orders: Vec<SavedOrder>,
    pub heartbeat: Option<DateTime<Utc>>,
}
