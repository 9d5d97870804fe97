//! Pure expiration-payoff math for option strategies.
//!
//! Everything here is deterministic and free of I/O: the monitor's fill
//! accounting and UI charting both lean on the same leg model and sign
//! conventions (positive = profit to the holder of the strategy).

pub mod engine;
pub mod scenario;

pub use engine::{
    breakeven_from_curve, metrics, payoff, payoff_curve, total_debit, CurvePoint, PayoffMetrics,
};
pub use scenario::{scenarios, Scenario, ScenarioDirection, ScenarioLeg};
