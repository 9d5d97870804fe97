//! Persisted limit order records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::OptionRight;

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Time-in-force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Auto-cancels at the end of the placement day if unfilled.
    Day,
    /// Good-til-canceled: persists until filled or expiration.
    Gtc,
}

/// Lifecycle status of a saved order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Working,
    Filled,
    Canceled,
    /// Set by order-placement callers on submission failure; the monitor
    /// never produces this status itself.
    Failed,
}

/// A tracked limit order.
///
/// `fill_price`/`fill_quantity` are `Some` iff `status == Filled`; the fill
/// transition in the monitor is the only writer of those fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOrder {
    pub id: String,
    pub placed_at: DateTime<Utc>,
    pub symbol: String,
    pub expiration: Option<NaiveDate>,
    pub right: OptionRight,
    pub strike: Decimal,
    pub side: OrderSide,
    pub quantity: u32,
    pub limit: Option<Decimal>,
    pub tif: TimeInForce,
    pub status: OrderStatus,
    pub fill_price: Option<Decimal>,
    pub fill_quantity: Option<u32>,
    pub note: Option<String>,
}

impl SavedOrder {
    /// A fresh working order with a generated id, placed now.
    #[allow(clippy::too_many_arguments)]
    pub fn new_working(
        symbol: impl Into<String>,
        expiration: Option<NaiveDate>,
        right: OptionRight,
        strike: Decimal,
        side: OrderSide,
        quantity: u32,
        limit: Option<Decimal>,
        tif: TimeInForce,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            placed_at: Utc::now(),
            symbol: symbol.into(),
            expiration,
            right,
            strike,
            side,
            quantity,
            limit,
            tif,
            status: OrderStatus::Working,
            fill_price: None,
            fill_quantity: None,
            note: None,
        }
    }

    pub fn is_working(&self) -> bool {
        self.status == OrderStatus::Working
    }

    /// Human-readable contract description (e.g., "NVDA 140C 2026-03-20 buy x2").
    pub fn display_name(&self) -> String {
        let expiry = self
            .expiration
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        format!(
            "{} {}{} {} {:?} x{}",
            self.symbol, self.strike, self.right, expiry, self.side, self.quantity
        )
    }
}
