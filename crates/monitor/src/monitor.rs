//! The imperative shell around [`decide`]: tick loop, store writes,
//! heartbeat.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use optrack_core::{
    MonitorConfig, OptionRight, OrderStatus, OrderStore, ProviderError, QuoteProvider, SavedOrder,
};

use crate::decide::{decide, Decision};

const DEFAULT_STRIKE_TOLERANCE: Decimal = dec!(0.0001);

/// On-demand bid/ask/mid lookup result for UI display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketRefs {
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub mid: Option<Decimal>,
}

/// One monitor per process, explicitly constructed with its collaborators so
/// tests can drive ticks synchronously with fakes.
pub struct OrderMonitor {
    provider: RwLock<Arc<dyn QuoteProvider>>,
    store: Arc<dyn OrderStore>,
    tick_interval: Duration,
    strike_tolerance: Decimal,
    running: AtomicBool,
    generation: AtomicU64,
    last_heartbeat: RwLock<Option<DateTime<Utc>>>,
    heartbeat_tx: broadcast::Sender<DateTime<Utc>>,
}

impl OrderMonitor {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: Arc<dyn OrderStore>,
        config: &MonitorConfig,
    ) -> Self {
        let (heartbeat_tx, _) = broadcast::channel(16);
        Self {
            provider: RwLock::new(provider),
            store,
            tick_interval: Duration::from_secs(config.tick_interval_secs),
            strike_tolerance: Decimal::from_f64(config.strike_tolerance)
                .unwrap_or(DEFAULT_STRIKE_TOLERANCE),
            running: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            last_heartbeat: RwLock::new(None),
            heartbeat_tx,
        }
    }

    /// Begin the tick loop. Idempotent: a second call while running is a
    /// no-op.
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("Monitor already running, start ignored");
            return;
        }

        // Each start arms a fresh generation. A loop from a previous start
        // that wakes after a stop/start cycle sees a newer generation and
        // exits instead of running alongside the new loop.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            info!(interval_secs = monitor.tick_interval.as_secs(), "Order monitor started");
            // The flag is observed only at the top of each iteration, so an
            // in-flight tick always completes.
            while monitor.running.load(Ordering::SeqCst)
                && monitor.generation.load(Ordering::SeqCst) == generation
            {
                monitor.run_tick().await;
                tokio::time::sleep(monitor.tick_interval).await;
            }
            info!("Order monitor stopped");
        });
    }

    /// Request the loop to end after the current iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Timestamp of the last completed tick in this process.
    pub fn last_heartbeat(&self) -> Option<DateTime<Utc>> {
        *self.last_heartbeat.read()
    }

    /// Heartbeat broadcasts, one per completed tick.
    pub fn subscribe_heartbeat(&self) -> broadcast::Receiver<DateTime<Utc>> {
        self.heartbeat_tx.subscribe()
    }

    /// Hot-swap the quote source; the next tick uses the new provider. No
    /// transactional guarantee mid-tick.
    pub fn set_quote_provider(&self, provider: Arc<dyn QuoteProvider>) {
        *self.provider.write() = provider;
        info!("Quote provider swapped");
    }

    fn current_provider(&self) -> Arc<dyn QuoteProvider> {
        Arc::clone(&self.provider.read())
    }

    /// One full sweep over working orders, then an unconditional heartbeat.
    ///
    /// Exposed so tests advance ticks without real timers.
    pub async fn run_tick(&self) {
        let orders = match self.store.load().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "Failed to load orders, sweeping nothing this tick");
                Vec::new()
            }
        };

        // One order at a time, no fan-out; a failure on one order never
        // blocks the rest.
        for order in orders.iter().filter(|o| o.is_working()) {
            self.evaluate_order(order).await;
        }

        self.write_heartbeat().await;
    }

    async fn evaluate_order(&self, order: &SavedOrder) {
        let decision = match order.expiration {
            // Malformed record: nothing to fetch, never terminal on this
            // basis alone.
            None => decide(order, Err(&missing_chain_error()), Utc::now(), self.strike_tolerance),
            Some(expiration) => {
                let provider = self.current_provider();
                let result = provider
                    .fetch_option_chain(&order.symbol, Some(expiration))
                    .await;
                decide(order, result.as_ref(), Utc::now(), self.strike_tolerance)
            }
        };

        self.apply(order, decision).await;
    }

    async fn apply(&self, order: &SavedOrder, decision: Decision) {
        match decision {
            Decision::Fill { price } => {
                let quantity = order.quantity;
                let result = self
                    .store
                    .update(
                        &order.id,
                        Box::new(move |o| {
                            // A racing user cancel wins; only a record still
                            // working takes the fill.
                            if o.status == OrderStatus::Working {
                                o.status = OrderStatus::Filled;
                                o.fill_price = Some(price);
                                o.fill_quantity = Some(quantity);
                            }
                        }),
                    )
                    .await;
                match result {
                    Ok(_) => info!(
                        order = %order.display_name(),
                        price = %price,
                        "Order filled"
                    ),
                    Err(e) => warn!(order_id = %order.id, error = %e, "Failed to apply fill"),
                }
            }
            Decision::Cancel { reason } => {
                let result = self
                    .store
                    .update(
                        &order.id,
                        Box::new(|o| {
                            if o.status == OrderStatus::Working {
                                o.status = OrderStatus::Canceled;
                            }
                        }),
                    )
                    .await;
                match result {
                    Ok(_) => info!(order = %order.display_name(), ?reason, "Order canceled"),
                    Err(e) => warn!(order_id = %order.id, error = %e, "Failed to apply cancel"),
                }
            }
            Decision::Defer { reason } => {
                debug!(order_id = %order.id, ?reason, "Order deferred to next tick");
            }
            Decision::StillWorking => {}
        }
    }

    async fn write_heartbeat(&self) {
        let now = Utc::now();
        *self.last_heartbeat.write() = Some(now);
        if let Err(e) = self.store.save_heartbeat(now).await {
            warn!(error = %e, "Failed to persist heartbeat");
        }
        // Broadcast regardless of persistence; no receivers is fine.
        let _ = self.heartbeat_tx.send(now);
    }

    /// On-demand bid/ask/mid for one contract, independent of the tick
    /// loop, using the same strike-matching rule.
    ///
    /// # Errors
    /// Propagates provider failures; a missing contract yields empty refs.
    pub async fn fetch_market_references(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        is_call: bool,
        strike: Decimal,
    ) -> Result<MarketRefs, ProviderError> {
        let right = if is_call {
            OptionRight::Call
        } else {
            OptionRight::Put
        };
        let chain = self
            .current_provider()
            .fetch_option_chain(symbol, Some(expiration))
            .await?;

        Ok(chain
            .find_contract(right, strike, self.strike_tolerance)
            .map_or_else(MarketRefs::default, |c| MarketRefs {
                bid: c.bid,
                ask: c.ask,
                mid: c.mid(),
            }))
    }
}

/// Placeholder error for the no-expiration path, where no fetch happens.
fn missing_chain_error() -> ProviderError {
    ProviderError::NotFound("order has no expiration".to_string())
}
