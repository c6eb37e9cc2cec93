//! Gate.io futures API v4 wire types.
//!
//! Only the fields the adapter reads are declared; everything else in the
//! exchange payloads is ignored. Decimal amounts arrive as strings and are
//! parsed at the edge with [`parse_amount`].

use perp_core::trading::{ContractMetadata, OrderRequest, TriggerOrder};
use serde::{Deserialize, Serialize};

/// Parse an exchange decimal string, treating empty or malformed values as 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub message: String,
}

/// `GET /futures/{settle}/accounts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuturesAccount {
    /// Total equity: wallet balance plus unrealized PnL.
    pub total: String,
    #[serde(default)]
    pub unrealised_pnl: String,
    #[serde(default)]
    pub available: String,
    #[serde(default)]
    pub currency: String,
}

/// One element of `GET /futures/{settle}/contracts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    #[serde(default)]
    pub order_size_min: i64,
    #[serde(default)]
    pub order_size_max: i64,
    #[serde(default)]
    pub order_price_round: String,
    #[serde(default)]
    pub quanto_multiplier: String,
    #[serde(default)]
    pub in_delisting: bool,
}

impl Contract {
    /// Trading rules relevant to order formatting.
    pub fn to_metadata(&self) -> ContractMetadata {
        ContractMetadata {
            contract_name: self.name.clone(),
            min_order_size: self.order_size_min as f64,
            precision: 0,
            price_tick: parse_amount(&self.order_price_round),
        }
    }
}

/// `GET /futures/{settle}/positions/{contract}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    pub contract: String,
    /// Signed contract count: negative is short.
    pub size: i64,
    #[serde(default)]
    pub leverage: String,
    #[serde(default)]
    pub entry_price: String,
    #[serde(default)]
    pub mark_price: String,
    #[serde(default)]
    pub unrealised_pnl: String,
    #[serde(default)]
    pub liq_price: String,
    #[serde(default)]
    pub margin: String,
}

/// Response of order creation and of bulk cancellation (one per order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FuturesOrderResponse {
    pub id: i64,
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Response of `POST /futures/{settle}/price_orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerOrderResponse {
    pub id: i64,
}

/// One element of `GET /futures/{settle}/tickers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ticker {
    pub contract: String,
    pub last: String,
    #[serde(default)]
    pub mark_price: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /futures/{settle}/price_orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTriggeredOrder {
    pub initial: OrderRequest,
    pub trigger: PriceTrigger,
}

/// The `trigger` half of a price-triggered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrigger {
    /// 0 = trigger on price.
    pub strategy_type: i32,
    pub price_type: i32,
    pub price: String,
    pub rule: i32,
    /// Seconds until the trigger expires.
    pub expiration: u64,
}

impl From<&TriggerOrder> for PriceTriggeredOrder {
    fn from(order: &TriggerOrder) -> Self {
        Self {
            initial: order.initial.clone(),
            trigger: PriceTrigger {
                strategy_type: 0,
                price_type: order.price_type.code(),
                price: order.trigger_price.clone(),
                rule: order.rule.code(),
                expiration: order.expiration,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use perp_core::enums::{TriggerPriceType, TriggerRule};

    use super::*;

    #[test]
    fn parse_amount_tolerates_garbage() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
    }

    #[test]
    fn decode_position() {
        let json = r#"{"contract":"ETH_USDT","size":-5,"leverage":"20","entry_price":"3000.5",
            "mark_price":"2990","unrealised_pnl":"5.2","liq_price":"3500","margin":"75.1",
            "mode":"single"}"#;
        let pos: Position = serde_json::from_str(json).unwrap();
        assert_eq!(pos.size, -5);
        assert_eq!(parse_amount(&pos.entry_price), 3000.5);
    }

    #[test]
    fn contract_metadata_from_wire() {
        let json = r#"{"name":"BTC_USDT","order_size_min":1,"order_size_max":1000000,
            "order_price_round":"0.1","quanto_multiplier":"0.0001","in_delisting":false}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        let meta = contract.to_metadata();
        assert_eq!(meta.contract_name, "BTC_USDT");
        assert_eq!(meta.min_order_size, 1.0);
        assert_eq!(meta.precision, 0);
        assert_eq!(meta.price_tick, 0.1);
    }

    #[test]
    fn trigger_order_wire_shape() {
        let order = TriggerOrder {
            initial: OrderRequest::market("BTC_USDT", -2).reduce_only(),
            trigger_price: "25000.0".into(),
            rule: TriggerRule::LessOrEqual,
            price_type: TriggerPriceType::Mark,
            expiration: 2_592_000,
        };
        let json = serde_json::to_value(PriceTriggeredOrder::from(&order)).unwrap();
        assert_eq!(json["initial"]["contract"], "BTC_USDT");
        assert_eq!(json["initial"]["size"], -2);
        assert_eq!(json["initial"]["price"], "0");
        assert_eq!(json["initial"]["tif"], "ioc");
        assert_eq!(json["initial"]["reduce_only"], true);
        assert_eq!(json["trigger"]["strategy_type"], 0);
        assert_eq!(json["trigger"]["price_type"], 1);
        assert_eq!(json["trigger"]["rule"], 2);
        assert_eq!(json["trigger"]["price"], "25000.0");
        assert_eq!(json["trigger"]["expiration"], 2_592_000);
    }
}
