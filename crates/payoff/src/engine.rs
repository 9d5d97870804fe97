//! Payoff curves and summary metrics.

use optrack_core::{LegSide, OptionLeg, OptionRight};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sampling domain used by [`metrics`]: `[0, 2 * center]` in 200 steps.
const METRICS_WIDTH_FACTOR: Decimal = Decimal::ONE;
const METRICS_STEPS: u32 = 200;

/// One sampled point of a payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub underlying: Decimal,
    pub profit_loss: Decimal,
}

/// Summary metrics over the sampled payoff curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMetrics {
    /// Worst sampled P/L, domain bounds included. For strategies without an
    /// analytic floor this is a sampling approximation, not a closed form.
    pub max_loss: Decimal,
    /// Best sampled P/L; `None` means unlimited upside.
    pub max_gain: Option<Decimal>,
    /// Underlying price where the payoff crosses zero, if any crossing lies
    /// in the sampled range.
    pub breakeven: Option<Decimal>,
}

/// Intrinsic value per share at expiration.
pub(crate) fn intrinsic(kind: OptionRight, strike: Decimal, underlying: Decimal) -> Decimal {
    match kind {
        OptionRight::Call => (underlying - strike).max(Decimal::ZERO),
        OptionRight::Put => (strike - underlying).max(Decimal::ZERO),
    }
}

/// Per-share P/L of one leg at expiration.
pub(crate) fn per_share(leg: &OptionLeg, underlying: Decimal) -> Decimal {
    let value = intrinsic(leg.kind, leg.strike, underlying);
    match leg.side {
        LegSide::Long => value - leg.premium,
        LegSide::Short => leg.premium - value,
    }
}

/// Net premium paid to open the strategy.
///
/// Positive = net debit paid, negative = net credit received.
pub fn total_debit(legs: &[OptionLeg]) -> Decimal {
    legs.iter()
        .map(|leg| {
            let cost = leg.premium * Decimal::from(leg.contracts) * leg.multiplier;
            match leg.side {
                LegSide::Long => cost,
                LegSide::Short => -cost,
            }
        })
        .sum()
}

/// Total strategy P/L at expiration for a given underlying price.
pub fn payoff(legs: &[OptionLeg], underlying: Decimal) -> Decimal {
    legs.iter()
        .map(|leg| per_share(leg, underlying) * Decimal::from(leg.contracts) * leg.multiplier)
        .sum()
}

/// Sample the payoff over `[center*(1-width_factor), center*(1+width_factor)]`.
///
/// Returns a fresh vector of `steps + 1` evenly spaced points, both bounds
/// included, underlying values strictly increasing.
pub fn payoff_curve(
    legs: &[OptionLeg],
    center: Decimal,
    width_factor: Decimal,
    steps: u32,
) -> Vec<CurvePoint> {
    let lo = center * (Decimal::ONE - width_factor);
    let hi = center * (Decimal::ONE + width_factor);
    if steps == 0 {
        return vec![CurvePoint {
            underlying: lo,
            profit_loss: payoff(legs, lo),
        }];
    }

    let step = (hi - lo) / Decimal::from(steps);
    (0..=steps)
        .map(|i| {
            // Pin the last sample to the exact upper bound.
            let underlying = if i == steps {
                hi
            } else {
                lo + step * Decimal::from(i)
            };
            CurvePoint {
                underlying,
                profit_loss: payoff(legs, underlying),
            }
        })
        .collect()
}

/// Scan a sampled curve for a zero crossing and linearly interpolate.
///
/// Among multiple crossings the one nearest `center` wins; the earliest
/// candidate wins an exact distance tie. `None` when the payoff never
/// changes sign in the sampled range.
pub fn breakeven_from_curve(curve: &[CurvePoint], center: Decimal) -> Option<Decimal> {
    let mut best: Option<Decimal> = None;

    let mut consider = |candidate: Decimal| {
        let keep = match best {
            Some(current) => (candidate - center).abs() < (current - center).abs(),
            None => true,
        };
        if keep {
            best = Some(candidate);
        }
    };

    for pair in curve.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.profit_loss == Decimal::ZERO {
            consider(a.underlying);
        } else if a.profit_loss * b.profit_loss < Decimal::ZERO {
            let span = b.profit_loss - a.profit_loss;
            let t = -a.profit_loss / span;
            consider(a.underlying + (b.underlying - a.underlying) * t);
        }
    }
    if let Some(last) = curve.last() {
        if last.profit_loss == Decimal::ZERO {
            consider(last.underlying);
        }
    }

    best
}

/// True when the strategy's payoff is unbounded above: the net signed call
/// quantity is positive, so P/L grows without limit past the top strike.
fn unlimited_upside(legs: &[OptionLeg]) -> bool {
    let net_call_quantity: Decimal = legs
        .iter()
        .filter(|leg| leg.kind == OptionRight::Call)
        .map(OptionLeg::signed_quantity)
        .sum();
    net_call_quantity > Decimal::ZERO
}

/// Max loss / max gain / breakeven over the sampled curve around `center`.
pub fn metrics(legs: &[OptionLeg], center: Decimal) -> PayoffMetrics {
    let curve = payoff_curve(legs, center, METRICS_WIDTH_FACTOR, METRICS_STEPS);

    let max_loss = curve
        .iter()
        .map(|p| p.profit_loss)
        .min()
        .unwrap_or(Decimal::ZERO);

    let max_gain = if unlimited_upside(legs) {
        None
    } else {
        curve.iter().map(|p| p.profit_loss).max()
    };

    PayoffMetrics {
        max_loss,
        max_gain,
        breakeven: breakeven_from_curve(&curve, center),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn long_call(strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg::new(OptionRight::Call, LegSide::Long, strike, premium)
    }

    fn short_call(strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg::new(OptionRight::Call, LegSide::Short, strike, premium)
    }

    fn long_put(strike: Decimal, premium: Decimal) -> OptionLeg {
        OptionLeg::new(OptionRight::Put, LegSide::Long, strike, premium)
    }

    #[test]
    fn long_call_at_the_money_loses_full_premium() {
        let legs = vec![long_call(dec!(100), dec!(2.50)).with_contracts(3)];
        // intrinsic = 0 at the strike, so P/L = -premium * contracts * 100
        assert_eq!(payoff(&legs, dec!(100)), dec!(-750));
    }

    #[test]
    fn long_call_gains_past_strike() {
        let legs = vec![long_call(dec!(100), dec!(2.50))];
        assert_eq!(payoff(&legs, dec!(110)), dec!(750));
    }

    #[test]
    fn short_leg_mirrors_long_leg_payoff() {
        let long = vec![long_call(dec!(100), dec!(2.50))];
        let short = vec![short_call(dec!(100), dec!(2.50))];
        for s in [dec!(80), dec!(100), dec!(125)] {
            assert_eq!(payoff(&long, s), -payoff(&short, s));
        }
    }

    #[test]
    fn total_debit_sign_flips_with_side() {
        let long = vec![long_call(dec!(100), dec!(2.50)).with_contracts(2)];
        let short = vec![short_call(dec!(100), dec!(2.50)).with_contracts(2)];
        assert_eq!(total_debit(&long), dec!(500));
        assert_eq!(total_debit(&short), dec!(-500));
    }

    #[test]
    fn bull_call_spread_debit_nets_the_premiums() {
        let legs = vec![long_call(dec!(100), dec!(3.00)), short_call(dec!(110), dec!(1.20))];
        assert_eq!(total_debit(&legs), dec!(180));
    }

    #[test]
    fn curve_spans_bounds_with_steps_plus_one_points() {
        let legs = vec![long_call(dec!(100), dec!(2.50))];
        let curve = payoff_curve(&legs, dec!(100), dec!(0.6), 90);
        assert_eq!(curve.len(), 91);
        assert_eq!(curve.first().unwrap().underlying, dec!(40));
        assert_eq!(curve.last().unwrap().underlying, dec!(160));
        for pair in curve.windows(2) {
            assert!(pair[0].underlying < pair[1].underlying);
        }
    }

    #[test]
    fn curve_is_regenerated_per_call() {
        let legs = vec![long_call(dec!(100), dec!(2.50))];
        let a = payoff_curve(&legs, dec!(100), dec!(0.5), 10);
        let b = payoff_curve(&legs, dec!(100), dec!(0.5), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn long_call_metrics_report_unlimited_gain() {
        let legs = vec![long_call(dec!(100), dec!(2.50))];
        let m = metrics(&legs, dec!(100));
        assert_eq!(m.max_loss, dec!(-250));
        assert_eq!(m.max_gain, None);
        // Breakeven at strike + premium.
        assert_eq!(m.breakeven, Some(dec!(102.50)));
    }

    #[test]
    fn bull_call_spread_metrics_are_bounded() {
        let legs = vec![long_call(dec!(100), dec!(3.00)), short_call(dec!(110), dec!(1.20))];
        let m = metrics(&legs, dec!(100));
        // Max loss is the net debit, max gain the spread width minus it.
        assert_eq!(m.max_loss, dec!(-180));
        assert_eq!(m.max_gain, Some(dec!(820)));
        assert_eq!(m.breakeven, Some(dec!(101.80)));
    }

    #[test]
    fn long_put_breakeven_interpolates_below_strike() {
        let legs = vec![long_put(dec!(100), dec!(4.00))];
        let m = metrics(&legs, dec!(100));
        assert_eq!(m.breakeven, Some(dec!(96)));
        // Put upside is bounded by the underlying hitting zero.
        assert_eq!(m.max_gain, Some(dec!(9600)));
    }

    #[test]
    fn breakeven_is_none_without_a_crossing() {
        // Strictly positive payoff over the whole sampled range.
        let curve = vec![
            CurvePoint { underlying: dec!(90), profit_loss: dec!(5) },
            CurvePoint { underlying: dec!(100), profit_loss: dec!(8) },
            CurvePoint { underlying: dec!(110), profit_loss: dec!(3) },
        ];
        assert_eq!(breakeven_from_curve(&curve, dec!(100)), None);
    }

    #[test]
    fn breakeven_prefers_crossing_nearest_center() {
        // Synthetic curve crossing zero near 95 and near 140.
        let curve = vec![
            CurvePoint { underlying: dec!(90), profit_loss: dec!(-10) },
            CurvePoint { underlying: dec!(100), profit_loss: dec!(10) },
            CurvePoint { underlying: dec!(130), profit_loss: dec!(10) },
            CurvePoint { underlying: dec!(150), profit_loss: dec!(-10) },
        ];
        assert_eq!(breakeven_from_curve(&curve, dec!(100)), Some(dec!(95)));
        assert_eq!(breakeven_from_curve(&curve, dec!(150)), Some(dec!(140)));
    }

    #[test]
    fn zero_steps_yields_single_sample() {
        let legs = vec![long_call(dec!(100), dec!(1))];
        let curve = payoff_curve(&legs, dec!(100), dec!(0.5), 0);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].underlying, dec!(50));
    }
}
