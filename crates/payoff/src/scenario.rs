//! Narrative two-outcome "what-if" breakdowns built on the payoff engine.

use optrack_core::OptionLeg;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{intrinsic, per_share};

/// Which move a scenario describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioDirection {
    Up,
    Down,
}

/// Per-leg breakdown inside one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLeg {
    pub leg: OptionLeg,
    pub intrinsic: Decimal,
    pub per_share: Decimal,
    pub profit_loss: Decimal,
}

/// One evaluated outcome at a hypothetical underlying price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub direction: ScenarioDirection,
    pub underlying: Decimal,
    pub legs: Vec<ScenarioLeg>,
    pub total: Decimal,
}

fn evaluate(legs: &[OptionLeg], direction: ScenarioDirection, underlying: Decimal) -> Scenario {
    let rows: Vec<ScenarioLeg> = legs
        .iter()
        .map(|leg| {
            let value = intrinsic(leg.kind, leg.strike, underlying);
            let share = per_share(leg, underlying);
            ScenarioLeg {
                leg: leg.clone(),
                intrinsic: value,
                per_share: share,
                profit_loss: share * Decimal::from(leg.contracts) * leg.multiplier,
            }
        })
        .collect();
    let total = rows.iter().map(|r| r.profit_loss).sum();

    Scenario {
        direction,
        underlying,
        legs: rows,
        total,
    }
}

/// Evaluate an up-move and a down-move outcome around `center`.
///
/// The scenario with the strictly higher total P/L comes first; on a tie the
/// up-move keeps the lead. Pure function of its inputs.
pub fn scenarios(
    legs: &[OptionLeg],
    center: Decimal,
    up_pct: Decimal,
    down_pct: Decimal,
) -> [Scenario; 2] {
    let up = evaluate(legs, ScenarioDirection::Up, center * (Decimal::ONE + up_pct));
    let down = evaluate(
        legs,
        ScenarioDirection::Down,
        center * (Decimal::ONE - down_pct),
    );

    if down.total > up.total {
        [down, up]
    } else {
        [up, down]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optrack_core::{LegSide, OptionRight};
    use rust_decimal_macros::dec;

    fn long_call(strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg::new(OptionRight::Call, LegSide::Long, strike, premium)
    }

    fn long_put(strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg::new(OptionRight::Put, LegSide::Long, strike, premium)
    }

    #[test]
    fn winning_scenario_comes_first() {
        // Long call: up-move wins (+50 vs full premium loss).
        let legs = vec![long_call(dec!(100), dec!(2.00))];
        let [first, second] = scenarios(&legs, dec!(100), dec!(0.10), dec!(0.10));
        assert_eq!(first.direction, ScenarioDirection::Up);
        assert!(first.total > second.total);

        // Long put: down-move wins and is listed first.
        let legs = vec![long_put(dec!(100), dec!(2.00))];
        let [first, _] = scenarios(&legs, dec!(100), dec!(0.10), dec!(0.10));
        assert_eq!(first.direction, ScenarioDirection::Down);
    }

    #[test]
    fn tie_keeps_up_move_first() {
        // No legs: both totals are zero.
        let [first, second] = scenarios(&[], dec!(100), dec!(0.05), dec!(0.05));
        assert_eq!(first.direction, ScenarioDirection::Up);
        assert_eq!(second.direction, ScenarioDirection::Down);
        assert_eq!(first.total, second.total);
    }

    #[test]
    fn per_leg_rows_reconcile_with_total() {
        let legs = vec![
            long_call(dec!(100), dec!(3.00)),
            OptionLeg::new(OptionRight::Call, LegSide::Short, dec!(110), dec!(1.20)),
        ];
        let [first, _] = scenarios(&legs, dec!(100), dec!(0.15), dec!(0.10));
        assert_eq!(first.underlying, dec!(115));
        let sum: Decimal = first.legs.iter().map(|r| r.profit_loss).sum();
        assert_eq!(sum, first.total);
        // Long 100C at 115: intrinsic 15, per-share 12, x100 = 1200.
        assert_eq!(first.legs[0].intrinsic, dec!(15));
        assert_eq!(first.legs[0].profit_loss, dec!(1200));
        // Short 110C at 115: intrinsic 5, per-share 1.20 - 5 = -3.80.
        assert_eq!(first.legs[1].profit_loss, dec!(-380));
    }

    #[test]
    fn scenario_prices_scale_from_center() {
        let legs = vec![long_call(dec!(100), dec!(1.00))];
        let [a, b] = scenarios(&legs, dec!(200), dec!(0.25), dec!(0.50));
        let up = if a.direction == ScenarioDirection::Up { &a } else { &b };
        let down = if a.direction == ScenarioDirection::Down { &a } else { &b };
        assert_eq!(up.underlying, dec!(250));
        assert_eq!(down.underlying, dec!(100));
    }
}
