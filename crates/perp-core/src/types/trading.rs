//! Trading-related data structures — account snapshots, orders, and results.
//!
//! These are the typed records exchanged between the controller and the
//! trading adapter. Amounts are `f64` in the settlement currency; order sizes
//! are signed integer contract counts.

use serde::{Deserialize, Serialize};

use super::enums::{PositionSide, TimeInForce, TriggerPriceType, TriggerRule};

// ---------------------------------------------------------------------------
// Account snapshots
// ---------------------------------------------------------------------------

/// Account balance in the settlement currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Wallet balance excluding unrealized PnL.
    pub wallet_balance: f64,
    /// Balance available for new margin.
    pub available_balance: f64,
    /// Unrealized PnL across all open positions.
    pub unrealized_profit: f64,
}

impl BalanceSnapshot {
    /// Decompose an exchange total-equity figure (wallet + PnL) into a snapshot.
    ///
    /// `wallet_balance + unrealized_profit == total_equity` holds by
    /// construction.
    pub fn from_total_equity(
        total_equity: f64,
        unrealized_profit: f64,
        available_balance: f64,
    ) -> Self {
        Self {
            wallet_balance: total_equity - unrealized_profit,
            available_balance,
            unrealized_profit,
        }
    }

    /// Wallet balance plus unrealized PnL.
    pub fn total_equity(&self) -> f64 {
        self.wallet_balance + self.unrealized_profit
    }
}

/// One open futures position. Zero-size positions are never represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Canonical symbol (e.g. `"ETHUSDT"`).
    pub symbol: String,
    pub side: PositionSide,
    /// Absolute contract count, always > 0.
    pub quantity: f64,
    pub entry_price: f64,
    pub mark_price: f64,
    pub unrealized_profit: f64,
    pub leverage: f64,
    pub liquidation_price: f64,
    /// Margin held by the position, as reported by the exchange.
    pub margin: f64,
}

/// Per-contract trading rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMetadata {
    /// Exchange contract name (e.g. `"BTC_USDT"`).
    pub contract_name: String,
    /// Minimum order size in contracts.
    pub min_order_size: f64,
    /// Decimal places of an order quantity. Always 0 for whole-contract venues.
    pub precision: u32,
    /// Minimum price increment.
    pub price_tick: f64,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Price string denoting a market order.
pub const MARKET_PRICE: &str = "0";

/// An order as submitted to the exchange.
///
/// The sign of `size` encodes direction: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub contract: String,
    pub size: i64,
    pub price: String,
    pub tif: TimeInForce,
    #[serde(default)]
    pub reduce_only: bool,
    /// Client tag attached to the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl OrderRequest {
    /// Market IOC order for `size` signed contracts.
    pub fn market(contract: impl Into<String>, size: i64) -> Self {
        Self {
            contract: contract.into(),
            size,
            price: MARKET_PRICE.to_string(),
            tif: TimeInForce::Ioc,
            reduce_only: false,
            text: None,
        }
    }

    /// Mark the order reduce-only.
    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A conditional reduce-only order that goes live once the reference price
/// crosses `trigger_price` in the direction given by `rule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerOrder {
    pub initial: OrderRequest,
    pub trigger_price: String,
    pub rule: TriggerRule,
    pub price_type: TriggerPriceType,
    /// Lifetime in seconds.
    pub expiration: u64,
}

/// Result of a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Exchange-assigned order ID.
    pub order_id: i64,
    /// Canonical symbol the order was placed for.
    pub symbol: String,
    /// Exchange order status (e.g. `"finished"`, `"open"`).
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_decomposition() {
        let snap = BalanceSnapshot::from_total_equity(110.0, 10.0, 90.0);
        assert_eq!(snap.wallet_balance, 100.0);
        assert_eq!(snap.available_balance, 90.0);
        assert_eq!(snap.unrealized_profit, 10.0);
        assert_eq!(snap.total_equity(), 110.0);
    }

    #[test]
    fn negative_pnl_raises_wallet_balance() {
        let snap = BalanceSnapshot::from_total_equity(95.0, -5.0, 80.0);
        assert_eq!(snap.wallet_balance, 100.0);
    }

    #[test]
    fn market_order_defaults() {
        let order = OrderRequest::market("BTC_USDT", -3).reduce_only();
        assert_eq!(order.price, MARKET_PRICE);
        assert!(order.reduce_only);
        assert_eq!(order.tif, TimeInForce::Ioc);
        assert_eq!(order.size, -3);
    }

    #[test]
    fn order_request_wire_shape() {
        let order = OrderRequest::market("ETH_USDT", 2).with_text("t-abc");
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["contract"], "ETH_USDT");
        assert_eq!(json["size"], 2);
        assert_eq!(json["price"], "0");
        assert_eq!(json["tif"], "ioc");
        assert_eq!(json["reduce_only"], false);
        assert_eq!(json["text"], "t-abc");
    }
}
