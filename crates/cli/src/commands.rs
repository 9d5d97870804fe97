//! Subcommand implementations.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use figment::{
    providers::{Format, Toml},
    Figment,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use optrack_core::{
    is_stale, AppConfig, OptionLeg, OptionRight, OrderSide, OrderStatus, OrderStore, SavedOrder,
    TimeInForce,
};
use optrack_monitor::OrderMonitor;
use optrack_store::JsonOrderStore;

use crate::fixture::FixtureQuoteProvider;

/// Strategy description for `analyze`. Decimals are TOML strings
/// (`strike = "100"`), matching the store's serialized form.
#[derive(Debug, Deserialize)]
struct StrategySpec {
    center: Decimal,
    legs: Vec<OptionLeg>,
}

pub struct PlaceArgs {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub right: String,
    pub strike: Decimal,
    pub side: String,
    pub quantity: u32,
    pub limit: Option<Decimal>,
    pub tif: String,
    pub note: Option<String>,
}

fn open_store(config: &AppConfig) -> Result<Arc<JsonOrderStore>> {
    let store = JsonOrderStore::open(&config.store.path)
        .with_context(|| format!("failed to open order store at {}", config.store.path))?;
    Ok(Arc::new(store))
}

/// Run the monitor against the fixture provider until Ctrl-C.
pub async fn run_monitor(config: &AppConfig, chain_path: &str) -> Result<()> {
    let store = open_store(config)?;
    let provider = Arc::new(FixtureQuoteProvider::open(chain_path)?);
    let monitor = Arc::new(OrderMonitor::new(provider, store, &config.monitor));

    monitor.start();
    info!("Monitor running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    monitor.stop();

    Ok(())
}

/// Print debit, metrics, and the two-outcome scenario pair for a strategy.
pub fn analyze(strategy_path: &str, up_pct: Decimal, down_pct: Decimal) -> Result<()> {
    let strategy: StrategySpec = Figment::from(Toml::file(strategy_path))
        .extract()
        .with_context(|| format!("failed to read strategy file {strategy_path}"))?;

    let debit = optrack_payoff::total_debit(&strategy.legs);
    let metrics = optrack_payoff::metrics(&strategy.legs, strategy.center);

    println!("Center price: {}", strategy.center);
    println!(
        "Net {}: {}",
        if debit >= Decimal::ZERO { "debit" } else { "credit" },
        debit.abs()
    );
    println!("Max loss:  {}", metrics.max_loss);
    match metrics.max_gain {
        Some(gain) => println!("Max gain:  {gain}"),
        None => println!("Max gain:  unlimited"),
    }
    match metrics.breakeven {
        Some(price) => println!("Breakeven: {price}"),
        None => println!("Breakeven: none in sampled range"),
    }

    println!();
    for scenario in optrack_payoff::scenarios(&strategy.legs, strategy.center, up_pct, down_pct) {
        println!(
            "If the underlying moves {:?} to {}:",
            scenario.direction, scenario.underlying
        );
        for row in &scenario.legs {
            println!(
                "  {:?} {:?} {} @ {}: intrinsic {}, per-share {}, P/L {}",
                row.leg.side,
                row.leg.kind,
                row.leg.strike,
                row.leg.premium,
                row.intrinsic,
                row.per_share,
                row.profit_loss
            );
        }
        println!("  Total P/L: {}", scenario.total);
    }

    Ok(())
}

pub async fn orders_list(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let orders = store.load().await?;
    if orders.is_empty() {
        println!("No saved orders.");
    }
    for order in &orders {
        let fill = match (order.fill_price, order.fill_quantity) {
            (Some(price), Some(qty)) => format!(" filled {qty} @ {price}"),
            _ => String::new(),
        };
        println!("{}  {:?}{}  [{}]", order.display_name(), order.status, fill, order.id);
    }

    let heartbeat = store.load_heartbeat().await?;
    if is_stale(heartbeat, Utc::now(), config.monitor.stale_after_secs) {
        println!("Monitor heartbeat: STALE ({heartbeat:?})");
    } else {
        println!("Monitor heartbeat: ok ({heartbeat:?})");
    }

    Ok(())
}

pub async fn orders_place(config: &AppConfig, args: PlaceArgs) -> Result<()> {
    let right = parse_right(&args.right)?;
    let side = match args.side.to_lowercase().as_str() {
        "buy" => OrderSide::Buy,
        "sell" => OrderSide::Sell,
        other => return Err(anyhow!("unknown side {other:?}, expected buy or sell")),
    };
    let tif = match args.tif.to_lowercase().as_str() {
        "day" => TimeInForce::Day,
        "gtc" => TimeInForce::Gtc,
        other => return Err(anyhow!("unknown tif {other:?}, expected day or gtc")),
    };
    if args.quantity == 0 {
        return Err(anyhow!("quantity must be at least 1"));
    }
    if args.strike < Decimal::ZERO {
        return Err(anyhow!("strike must be non-negative"));
    }

    let mut order = SavedOrder::new_working(
        args.symbol,
        Some(args.expiration),
        right,
        args.strike,
        side,
        args.quantity,
        args.limit,
        tif,
    );
    order.note = args.note;

    let store = open_store(config)?;
    let name = order.display_name();
    let id = order.id.clone();
    store.append(order).await?;
    // Only report success once the record is actually persisted.
    println!("Placed {name} [{id}]");

    Ok(())
}

/// Explicit user cancel: only a still-working record transitions.
pub async fn orders_cancel(config: &AppConfig, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let updated = store
        .update(
            id,
            Box::new(|o| {
                if o.status == OrderStatus::Working {
                    o.status = OrderStatus::Canceled;
                }
            }),
        )
        .await?;
    println!("{}  {:?}", updated.display_name(), updated.status);

    Ok(())
}

pub async fn orders_remove(config: &AppConfig, id: &str) -> Result<()> {
    let store = open_store(config)?;
    store.remove(id).await?;
    println!("Removed {id}");

    Ok(())
}

fn parse_right(raw: &str) -> Result<OptionRight> {
    match raw.to_lowercase().as_str() {
        "call" | "c" => Ok(OptionRight::Call),
        "put" | "p" => Ok(OptionRight::Put),
        other => Err(anyhow!("unknown right {other:?}, expected call or put")),
    }
}
