use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod fixture;

#[derive(Parser)]
#[command(name = "optrack")]
#[command(about = "Evaluate and track simple options strategies", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the order monitor until Ctrl-C
    Run {
        /// Fixture chain file used as the quote source
        #[arg(long, default_value = "demos/chain.json")]
        chain: String,
    },
    /// Analyze a strategy file: debit, metrics, scenarios
    Analyze {
        /// Strategy TOML file
        #[arg(short, long)]
        strategy: String,
        /// Up-move fraction for the what-if pair (0.10 = +10%)
        #[arg(long, default_value = "0.10")]
        up_pct: Decimal,
        /// Down-move fraction for the what-if pair
        #[arg(long, default_value = "0.10")]
        down_pct: Decimal,
    },
    /// Inspect and edit the saved order list
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List all saved orders plus monitor staleness
    List,
    /// Append a new working limit order
    Place {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        expiration: NaiveDate,
        /// "call" or "put"
        #[arg(long)]
        right: String,
        #[arg(long)]
        strike: Decimal,
        /// "buy" or "sell"
        #[arg(long)]
        side: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        limit: Option<Decimal>,
        /// "day" or "gtc"
        #[arg(long, default_value = "gtc")]
        tif: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Cancel a working order by id
    Cancel { id: String },
    /// Delete an order record by id
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = optrack_core::ConfigLoader::load_from(&cli.config)?;

    match cli.command {
        Commands::Run { chain } => commands::run_monitor(&config, &chain).await,
        Commands::Analyze {
            strategy,
            up_pct,
            down_pct,
        } => commands::analyze(&strategy, up_pct, down_pct),
        Commands::Orders { command } => match command {
            OrderCommands::List => commands::orders_list(&config).await,
            OrderCommands::Place {
                symbol,
                expiration,
                right,
                strike,
                side,
                quantity,
                limit,
                tif,
                note,
            } => {
                commands::orders_place(
                    &config,
                    commands::PlaceArgs {
                        symbol,
                        expiration,
                        right,
                        strike,
                        side,
                        quantity,
                        limit,
                        tif,
                        note,
                    },
                )
                .await
            }
            OrderCommands::Cancel { id } => commands::orders_cancel(&config, &id).await,
            OrderCommands::Remove { id } => commands::orders_remove(&config, &id).await,
        },
    }
}
