//! Option contract and chain snapshot types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "C"),
            Self::Put => write!(f, "P"),
        }
    }
}

/// A single quoted contract from a provider chain snapshot.
///
/// All quote fields are optional; delayed feeds routinely return partial
/// rows (bid-only, last-only, or nothing at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub kind: OptionRight,
    pub strike: Decimal,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub last: Option<Decimal>,
}

impl OptionContract {
    /// Best available midpoint price.
    ///
    /// Average of bid/ask when both are present and positive; otherwise
    /// whichever of bid/ask exists; otherwise the last trade; otherwise none.
    pub fn mid(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(b), Some(a)) if b > Decimal::ZERO && a > Decimal::ZERO => {
                Some((b + a) / Decimal::TWO)
            }
            _ => self.bid.or(self.ask).or(self.last),
        }
    }
}

/// Option chain snapshot for one underlying and (usually) one expiration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChainData {
    /// Available expirations, in chronological order.
    pub expirations: Vec<NaiveDate>,
    pub call_strikes: Vec<Decimal>,
    pub put_strikes: Vec<Decimal>,
    pub call_contracts: Vec<OptionContract>,
    pub put_contracts: Vec<OptionContract>,
}

impl OptionChainData {
    /// Contracts of the given right.
    pub fn contracts_for(&self, right: OptionRight) -> &[OptionContract] {
        match right {
            OptionRight::Call => &self.call_contracts,
            OptionRight::Put => &self.put_contracts,
        }
    }

    /// Find the contract whose strike matches within `tolerance` (absolute).
    pub fn find_contract(
        &self,
        right: OptionRight,
        strike: Decimal,
        tolerance: Decimal,
    ) -> Option<&OptionContract> {
        self.contracts_for(right)
            .iter()
            .find(|c| (c.strike - strike).abs() <= tolerance)
    }
}
