//! Pure per-order evaluation. No I/O, fully unit-testable with synthetic
//! chains.

use chrono::{DateTime, Utc};
use optrack_core::{OptionChainData, OptionContract, OrderSide, ProviderError, SavedOrder};
use rust_decimal::Decimal;

/// Why a working order was canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The contract expired before the order filled.
    Expired,
    /// A day order survived past its placement day.
    DayOrderLapsed,
}

/// Why an order was left untouched this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// Record has no expiration; it can never be matched against a chain.
    MissingExpiration,
    /// The provider failed; retried next tick.
    ProviderUnavailable,
    /// Chain came back but held no contract at the order's strike.
    ContractNotFound,
}

/// Outcome of evaluating one working order against one chain snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fill { price: Decimal },
    Cancel { reason: CancelReason },
    Defer { reason: DeferReason },
    StillWorking,
}

/// Whether current quotes satisfy the order's limit.
///
/// OR semantics between the touch price (ask for buys, bid for sells) and
/// the mid — a wide mid can trigger a fill even when the touch price does
/// not cross. Kept as-is pending product review; see DESIGN.md.
fn crosses(side: OrderSide, limit: Decimal, contract: &OptionContract, mid: Option<Decimal>) -> bool {
    match side {
        OrderSide::Buy => {
            contract.ask.is_some_and(|a| a <= limit) || mid.is_some_and(|m| m <= limit)
        }
        OrderSide::Sell => {
            contract.bid.is_some_and(|b| b >= limit) || mid.is_some_and(|m| m >= limit)
        }
    }
}

/// Execution price once crossed: touch price preferred over mid, limit as
/// the final fallback, never worse than the limit.
fn execution_price(
    side: OrderSide,
    limit: Decimal,
    contract: &OptionContract,
    mid: Option<Decimal>,
) -> Decimal {
    match side {
        OrderSide::Buy => contract
            .ask
            .map(|a| a.min(limit))
            .or_else(|| mid.map(|m| m.min(limit)))
            .unwrap_or(limit),
        OrderSide::Sell => contract
            .bid
            .map(|b| b.max(limit))
            .or_else(|| mid.map(|m| m.max(limit)))
            .unwrap_or(limit),
    }
}

/// Evaluate one working order against a chain fetch result.
///
/// Malformed orders, provider failures, and missing contracts all defer —
/// the order stays working and is retried next tick, indefinitely.
pub fn decide(
    order: &SavedOrder,
    chain: Result<&OptionChainData, &ProviderError>,
    now: DateTime<Utc>,
    strike_tolerance: Decimal,
) -> Decision {
    let Some(expiration) = order.expiration else {
        return Decision::Defer {
            reason: DeferReason::MissingExpiration,
        };
    };

    let Ok(chain) = chain else {
        return Decision::Defer {
            reason: DeferReason::ProviderUnavailable,
        };
    };

    let Some(contract) = chain.find_contract(order.right, order.strike, strike_tolerance) else {
        return Decision::Defer {
            reason: DeferReason::ContractNotFound,
        };
    };

    let mid = contract.mid();
    if let Some(limit) = order.limit {
        if crosses(order.side, limit, contract, mid) {
            return Decision::Fill {
                price: execution_price(order.side, limit, contract, mid),
            };
        }
    }

    let today = now.date_naive();
    if expiration < today {
        return Decision::Cancel {
            reason: CancelReason::Expired,
        };
    }
    if order.tif == optrack_core::TimeInForce::Day && order.placed_at.date_naive() != today {
        return Decision::Cancel {
            reason: CancelReason::DayOrderLapsed,
        };
    }

    Decision::StillWorking
}
