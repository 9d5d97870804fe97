//! Order monitoring: a recurring tick loop that re-evaluates working limit
//! orders against delayed quotes and applies fill/expire/cancel transitions.
//!
//! The state machine itself is the pure [`decide`] function; [`OrderMonitor`]
//! is the imperative shell that does the I/O and applies decisions.

pub mod decide;
pub mod monitor;

pub use decide::{decide, CancelReason, Decision, DeferReason};
pub use monitor::{MarketRefs, OrderMonitor};
