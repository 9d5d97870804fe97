//! Strategy leg model shared by the payoff engine and the monitor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::OptionRight;

/// Long or short side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegSide {
    Long,
    Short,
}

/// One option position within a strategy. Pure value, no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    pub kind: OptionRight,
    pub side: LegSide,
    pub strike: Decimal,
    /// Premium per share, as quoted.
    pub premium: Decimal,
    pub contracts: u32,
    /// Shares per contract; 100 for standard US equity options.
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
}

fn default_multiplier() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl OptionLeg {
    pub fn new(kind: OptionRight, side: LegSide, strike: Decimal, premium: Decimal) -> Self {
        Self {
            kind,
            side,
            strike,
            premium,
            contracts: 1,
            multiplier: default_multiplier(),
        }
    }

    pub fn with_contracts(mut self, contracts: u32) -> Self {
        self.contracts = contracts;
        self
    }

    /// Signed position size in shares: positive long, negative short.
    pub fn signed_quantity(&self) -> Decimal {
        let qty = Decimal::from(self.contracts) * self.multiplier;
        match self.side {
            LegSide::Long => qty,
            LegSide::Short => -qty,
        }
    }
}
