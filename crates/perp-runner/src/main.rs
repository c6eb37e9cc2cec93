//! # perp-runner
//!
//! Command-line driver for a single futures trading adapter.
//!
//! Loads a JSON configuration file, overlays credentials from the
//! environment, builds the adapter and runs one trading command against it.
//!
//! # Usage
//!
//! ```bash
//! perp-runner config.json balance
//! perp-runner config.json open-long BTCUSDT 2 10 --log-level debug
//! perp-runner config.json close-long BTCUSDT          # close the whole long
//! perp-runner config.json stop-loss BTCUSDT long 2 58000
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perp_core::enums::PositionSide;
use perp_td::FuturesTrader;
use perp_td::gate::GateTrader;
use tracing::{error, info};

/// Environment variable overriding `gate.api_key`.
const API_KEY_ENV: &str = "GATE_API_KEY";
/// Environment variable overriding `gate.secret_key`.
const SECRET_KEY_ENV: &str = "GATE_SECRET_KEY";

/// Perpetual futures trading runner.
#[derive(Parser)]
#[command(name = "perp-runner", about = "Perpetual futures runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Optional log directory for file output. Overrides `module.log_path`.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the account balance.
    Balance,
    /// List open positions.
    Positions,
    /// Show the last traded price.
    Price { symbol: String },
    /// Set leverage for a symbol.
    Leverage { symbol: String, leverage: u32 },
    /// Open or add to a long at market.
    OpenLong {
        symbol: String,
        quantity: f64,
        leverage: u32,
    },
    /// Open or add to a short at market.
    OpenShort {
        symbol: String,
        quantity: f64,
        leverage: u32,
    },
    /// Close a long at market; omit the quantity to close all of it.
    CloseLong {
        symbol: String,
        #[arg(default_value_t = 0.0)]
        quantity: f64,
    },
    /// Close a short at market; omit the quantity to close all of it.
    CloseShort {
        symbol: String,
        #[arg(default_value_t = 0.0)]
        quantity: f64,
    },
    /// Cancel every resting order on a symbol.
    Cancel { symbol: String },
    /// Place a stop-loss trigger order.
    StopLoss {
        symbol: String,
        side: PositionSide,
        quantity: f64,
        price: f64,
    },
    /// Place a take-profit trigger order.
    TakeProfit {
        symbol: String,
        side: PositionSide,
        quantity: f64,
        price: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut config = perp_core::config::load_config(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        config.gate.api_key = key;
    }
    if let Ok(secret) = std::env::var(SECRET_KEY_ENV) {
        config.gate.secret_key = secret;
    }

    // 2. Initialize logging
    let log_dir = cli.log_dir.clone().or_else(|| config.log_path());
    perp_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &config.module_name())?;
    let config_path = cli.config.display();
    let testnet = config.gate.testnet;
    info!("perp-runner starting: config={config_path}, testnet={testnet}");

    // 3. Build the adapter and run the command
    let trader = GateTrader::new(&config.gate).context("creating gate trader")?;
    let endpoint = trader.session().base_url();
    info!("perp-runner connected to {endpoint}");
    if let Err(e) = run(&trader, cli.command).await {
        error!("command failed: {e}");
        return Err(e.into());
    }
    Ok(())
}

async fn run(trader: &dyn FuturesTrader, command: Command) -> perp_core::error::TradeResult<()> {
    match command {
        Command::Balance => {
            let balance = trader.get_balance().await?;
            println!(
                "wallet={:.4} available={:.4} unrealized={:.4} equity={:.4}",
                balance.wallet_balance,
                balance.available_balance,
                balance.unrealized_profit,
                balance.total_equity()
            );
        }
        Command::Positions => {
            let positions = trader.get_positions().await?;
            if positions.is_empty() {
                println!("no open positions");
            }
            for p in positions {
                println!(
                    "{} {} qty={} entry={} mark={} upnl={:.4} lev={}x liq={} margin={:.4}",
                    p.symbol,
                    p.side,
                    p.quantity,
                    p.entry_price,
                    p.mark_price,
                    p.unrealized_profit,
                    p.leverage,
                    p.liquidation_price,
                    p.margin
                );
            }
        }
        Command::Price { symbol } => {
            println!("{symbol} {}", trader.get_market_price(&symbol).await?);
        }
        Command::Leverage { symbol, leverage } => {
            trader.set_leverage(&symbol, leverage).await?;
            println!("{symbol} leverage {leverage}x");
        }
        Command::OpenLong {
            symbol,
            quantity,
            leverage,
        } => {
            print_order(trader.open_long(&symbol, quantity, leverage).await?);
        }
        Command::OpenShort {
            symbol,
            quantity,
            leverage,
        } => {
            print_order(trader.open_short(&symbol, quantity, leverage).await?);
        }
        Command::CloseLong { symbol, quantity } => {
            print_order(trader.close_long(&symbol, quantity).await?);
        }
        Command::CloseShort { symbol, quantity } => {
            print_order(trader.close_short(&symbol, quantity).await?);
        }
        Command::Cancel { symbol } => {
            trader.cancel_all_orders(&symbol).await?;
            println!("{symbol} orders cancelled");
        }
        Command::StopLoss {
            symbol,
            side,
            quantity,
            price,
        } => {
            trader.set_stop_loss(&symbol, side, quantity, price).await?;
            println!("{symbol} {side} stop-loss at {price}");
        }
        Command::TakeProfit {
            symbol,
            side,
            quantity,
            price,
        } => {
            trader.set_take_profit(&symbol, side, quantity, price).await?;
            println!("{symbol} {side} take-profit at {price}");
        }
    }
    Ok(())
}

fn print_order(result: perp_core::trading::OrderResult) {
    println!(
        "order {} {} status={}",
        result.order_id, result.symbol, result.status
    );
}
