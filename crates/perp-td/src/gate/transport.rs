//! The authenticated exchange transport consumed by the adapter.
//!
//! [`FuturesTransport`] is the seam between the adapter logic (caches,
//! formatting, order engine) and the network. The production implementation
//! is [`GateRestClient`](super::rest::GateRestClient); tests substitute an
//! in-memory exchange.

use async_trait::async_trait;
use perp_core::trading::OrderRequest;
use thiserror::Error;

use super::types::{
    Contract, FuturesAccount, FuturesOrderResponse, Position, PriceTriggeredOrder, Ticker,
    TriggerOrderResponse,
};

/// Error returned by a transport call.
#[derive(Debug, Error)]
pub enum GateApiError {
    /// The exchange answered with a structured rejection.
    #[error("[{label}] {message} (HTTP {status})")]
    Exchange {
        status: u16,
        /// Machine-readable code, e.g. `INVALID_KEY`, `POSITION_NOT_FOUND`.
        label: String,
        /// Human-readable explanation.
        message: String,
    },

    /// Request could not be sent or the response could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected payload.
    #[error("decode error: {0}")]
    Decode(String),
}

impl GateApiError {
    /// Structured exchange rejection with a 400 status.
    pub fn exchange(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exchange {
            status: 400,
            label: label.into(),
            message: message.into(),
        }
    }

    /// The exchange message, if this is a structured rejection.
    pub fn exchange_message(&self) -> Option<&str> {
        match self {
            Self::Exchange { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, GateApiError>;

/// Futures operations of the exchange, bound to one set of credentials.
///
/// Every method takes the settlement currency (`usdt`) as the first path
/// segment, mirroring the exchange's URL layout.
#[async_trait]
pub trait FuturesTransport: Send + Sync {
    /// Futures account summary.
    async fn list_account(&self, settle: &str) -> ApiResult<FuturesAccount>;

    /// All contracts of the settlement currency.
    async fn list_contracts(&self, settle: &str) -> ApiResult<Vec<Contract>>;

    /// A single contract's trading rules.
    async fn get_contract(&self, settle: &str, contract: &str) -> ApiResult<Contract>;

    /// The position on one contract. Fails with `POSITION_NOT_FOUND` when
    /// none exists.
    async fn get_position(&self, settle: &str, contract: &str) -> ApiResult<Position>;

    /// Change a position's leverage.
    async fn update_leverage(
        &self,
        settle: &str,
        contract: &str,
        leverage: u32,
    ) -> ApiResult<Position>;

    /// Submit an order.
    async fn create_order(
        &self,
        settle: &str,
        order: &OrderRequest,
    ) -> ApiResult<FuturesOrderResponse>;

    /// Cancel every resting order on a contract; returns the cancelled orders.
    async fn cancel_orders(
        &self,
        settle: &str,
        contract: &str,
    ) -> ApiResult<Vec<FuturesOrderResponse>>;

    /// Submit a price-triggered (conditional) order.
    async fn create_trigger_order(
        &self,
        settle: &str,
        order: &PriceTriggeredOrder,
    ) -> ApiResult<TriggerOrderResponse>;

    /// Tickers, optionally filtered to a single contract.
    async fn list_tickers(&self, settle: &str, contract: Option<&str>) -> ApiResult<Vec<Ticker>>;
}
