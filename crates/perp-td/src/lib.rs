//! # perp-td
//!
//! Perpetual-futures trading adapters.
//!
//! Each exchange implements the [`FuturesTrader`] trait, which is the
//! surface a trading controller drives: account reads, leverage, market
//! open/close, order cancellation, prices and protective trigger orders.
//! Symbols are always given in canonical form (`BTCUSDT`); adapters convert
//! to their exchange's contract naming internally.
//!
//! ## Supported exchanges
//!
//! | Exchange | Module | Settlement | Order channel |
//! |----------|--------|------------|---------------|
//! | Gate.io  | `gate` | USDT       | REST (API v4) |

pub mod gate;

use async_trait::async_trait;
use perp_core::enums::PositionSide;
use perp_core::error::TradeResult;
use perp_core::trading::{BalanceSnapshot, OrderResult, PositionSnapshot};

/// Trait implemented by all futures trading adapters.
///
/// All operations take `&self` so they can be called concurrently from
/// multiple strategy tasks; there is no global serialization of trading
/// operations.
#[async_trait]
pub trait FuturesTrader: Send + Sync {
    /// Account balance (cached briefly).
    async fn get_balance(&self) -> TradeResult<BalanceSnapshot>;

    /// All open positions (cached briefly).
    async fn get_positions(&self) -> TradeResult<Vec<PositionSnapshot>>;

    /// Set leverage for a symbol. Already being at `leverage` is success.
    async fn set_leverage(&self, symbol: &str, leverage: u32) -> TradeResult<()>;

    /// Cancel resting orders, set leverage, then buy `quantity` at market.
    async fn open_long(
        &self,
        symbol: &str,
        quantity: f64,
        leverage: u32,
    ) -> TradeResult<OrderResult>;

    /// Cancel resting orders, set leverage, then sell `quantity` at market.
    async fn open_short(
        &self,
        symbol: &str,
        quantity: f64,
        leverage: u32,
    ) -> TradeResult<OrderResult>;

    /// Reduce-only market sell. A `quantity` of 0 closes the whole long.
    async fn close_long(&self, symbol: &str, quantity: f64) -> TradeResult<OrderResult>;

    /// Reduce-only market buy. A `quantity` of 0 closes the whole short.
    async fn close_short(&self, symbol: &str, quantity: f64) -> TradeResult<OrderResult>;

    /// Cancel every resting order on a symbol. Nothing to cancel is success.
    async fn cancel_all_orders(&self, symbol: &str) -> TradeResult<()>;

    /// Last traded price.
    async fn get_market_price(&self, symbol: &str) -> TradeResult<f64>;

    /// Reduce-only trigger order closing `quantity` when price moves against
    /// the position.
    async fn set_stop_loss(
        &self,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        trigger_price: f64,
    ) -> TradeResult<()>;

    /// Reduce-only trigger order closing `quantity` when price moves in
    /// favour of the position.
    async fn set_take_profit(
        &self,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        trigger_price: f64,
    ) -> TradeResult<()>;
}
