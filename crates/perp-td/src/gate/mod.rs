//! Gate.io USDT-settled perpetual futures adapter.
//!
//! Implements [`FuturesTrader`](crate::FuturesTrader) on top of Gate.io API v4.
//!
//! # Architecture
//!
//! ```text
//! GateTrader
//! ├── ExchangeSession         (credentials + signed REST transport, shared)
//! ├── AccountStateCache       (balance / positions, 15s TTL each)
//! ├── ContractMetadataCache   (trading rules, never expire)
//! └── QuantityFormatter       (float quantity/price → exchange strings)
//! ```
//!
//! Every operation takes `&self`; one instance can be driven by many tasks
//! at once. There is no cross-operation transaction: an open is a cancel, a
//! leverage update and an order submission, and a failure in a later step
//! does not undo the earlier ones. Nothing is retried.

pub mod auth;
pub mod cache;
pub mod classify;
pub mod contracts;
pub mod format;
pub mod rest;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use perp_core::config::GateConfig;
use perp_core::enums::{PositionSide, ProtectionKind, TriggerPriceType};
use perp_core::error::{TradeError, TradeResult};
use perp_core::symbol::{to_contract, to_symbol};
use perp_core::trading::{
    BalanceSnapshot, OrderRequest, OrderResult, PositionSnapshot, TriggerOrder,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use self::cache::AccountStateCache;
use self::classify::{ErrorClass, Operation, classify, to_trade_error};
use self::contracts::ContractMetadataCache;
use self::format::QuantityFormatter;
use self::session::ExchangeSession;
use self::transport::GateApiError;
use self::types::PriceTriggeredOrder;
use crate::FuturesTrader;

/// Gate limits the client tag to 28 characters including the `t-` prefix.
const ORDER_TAG_LEN: usize = 24;

/// Tunables of a [`GateTrader`].
#[derive(Debug, Clone, Copy)]
pub struct TraderOptions {
    /// Lifetime of the balance and position snapshots.
    pub cache_ttl: Duration,
    /// Wait after a genuine leverage change.
    pub leverage_cooldown: Duration,
    /// Lifetime of stop-loss / take-profit orders, in seconds.
    pub trigger_expiration_secs: u64,
}

impl Default for TraderOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(15),
            leverage_cooldown: Duration::from_secs(3),
            trigger_expiration_secs: 30 * 24 * 60 * 60,
        }
    }
}

impl From<&GateConfig> for TraderOptions {
    fn from(config: &GateConfig) -> Self {
        Self {
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            leverage_cooldown: Duration::from_secs(config.leverage_cooldown_secs),
            trigger_expiration_secs: config.trigger_expiration_secs,
        }
    }
}

/// Gate.io futures trading adapter.
pub struct GateTrader {
    session: Arc<ExchangeSession>,
    account: AccountStateCache,
    formatter: QuantityFormatter,
    options: TraderOptions,
}

impl GateTrader {
    /// Validate credentials, connect and build the caches.
    pub fn new(config: &GateConfig) -> TradeResult<Self> {
        let session = ExchangeSession::connect(config)?;
        Ok(Self::with_session(Arc::new(session), TraderOptions::from(config)))
    }

    /// Build an adapter over an existing session.
    pub fn with_session(session: Arc<ExchangeSession>, options: TraderOptions) -> Self {
        let contracts = Arc::new(ContractMetadataCache::new(Arc::clone(&session)));
        let ttl = options.cache_ttl;
        let account = AccountStateCache::new(Arc::clone(&session), Arc::clone(&contracts), ttl);
        Self {
            session,
            account,
            formatter: QuantityFormatter::new(contracts),
            options,
        }
    }

    pub fn session(&self) -> &ExchangeSession {
        &self.session
    }

    /// The open position for `symbol` on `side`, if any.
    pub async fn find_position(
        &self,
        symbol: &str,
        side: PositionSide,
    ) -> TradeResult<Option<PositionSnapshot>> {
        self.account.find_position(symbol, side).await
    }

    async fn open(
        &self,
        action: &'static str,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        leverage: u32,
    ) -> TradeResult<OrderResult> {
        let contract = to_contract(symbol);

        if let Err(e) = self.cancel_all_orders(symbol).await {
            warn!("[gate-td] {action} {contract}: cancel failed, continuing: {e}");
        }
        self.set_leverage(symbol, leverage).await?;

        let contracts = self.formatter.contract_count(symbol, quantity).await;
        let size = side.opening_direction().signed(contracts);
        let order = OrderRequest::market(&contract, size).with_text(order_tag());
        self.submit(action, order).await
    }

    async fn close(
        &self,
        action: &'static str,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
    ) -> TradeResult<OrderResult> {
        let contract = to_contract(symbol);

        let quantity = if quantity == 0.0 {
            match self.account.find_position(symbol, side).await? {
                Some(position) => position.quantity,
                None => {
                    return Err(TradeError::PositionNotFound {
                        symbol: to_symbol(&contract),
                        side,
                    });
                }
            }
        } else {
            quantity
        };

        let contracts = self.formatter.contract_count(symbol, quantity).await;
        let size = side.closing_direction().signed(contracts);
        let order = OrderRequest::market(&contract, size)
            .reduce_only()
            .with_text(order_tag());
        let result = self.submit(action, order).await?;

        if let Err(e) = self.cancel_all_orders(symbol).await {
            warn!("[gate-td] {action} {contract}: cancel of remaining orders failed: {e}");
        }
        Ok(result)
    }

    /// Submit a market order and drop the account snapshots it invalidates.
    async fn submit(&self, action: &'static str, order: OrderRequest) -> TradeResult<OrderResult> {
        debug!(
            "[gate-td] {action}: {} size={} reduce_only={}",
            order.contract, order.size, order.reduce_only
        );
        let rejected = |message| TradeError::Order { action, message };
        let response = self
            .session
            .transport()
            .create_order(self.session.settle(), &order)
            .await
            .map_err(|e| order_error(Operation::Order, e, rejected))?;

        info!(
            "[gate-td] {action} ok: {} size={} id={} status={}",
            order.contract, order.size, response.id, response.status
        );
        self.account.invalidate().await;

        Ok(OrderResult {
            order_id: response.id,
            symbol: to_symbol(&order.contract),
            status: response.status,
        })
    }

    async fn protect(
        &self,
        kind: ProtectionKind,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        trigger_price: f64,
    ) -> TradeResult<()> {
        let contract = to_contract(symbol);
        let contracts = self.formatter.contract_count(symbol, quantity).await;
        let trigger_price = self.formatter.format_price(symbol, trigger_price).await;

        let size = side.closing_direction().signed(contracts);
        let initial = OrderRequest::market(&contract, size)
            .reduce_only()
            .with_text(order_tag());
        let order = TriggerOrder {
            initial,
            trigger_price,
            rule: kind.trigger_rule(side),
            price_type: TriggerPriceType::Mark,
            expiration: self.options.trigger_expiration_secs,
        };

        let body = PriceTriggeredOrder::from(&order);
        let rejected = |message| TradeError::TriggerOrder { kind, message };
        let response = self
            .session
            .transport()
            .create_trigger_order(self.session.settle(), &body)
            .await
            .map_err(|e| order_error(Operation::TriggerOrder, e, rejected))?;

        info!(
            "[gate-td] {kind} set: {contract} {side} size={} trigger {:?} {} id={}",
            order.initial.size, order.rule, order.trigger_price, response.id
        );
        Ok(())
    }
}

#[async_trait]
impl FuturesTrader for GateTrader {
    async fn get_balance(&self) -> TradeResult<BalanceSnapshot> {
        self.account.get_balance().await
    }

    async fn get_positions(&self) -> TradeResult<Vec<PositionSnapshot>> {
        self.account.get_positions().await
    }

    async fn set_leverage(&self, symbol: &str, leverage: u32) -> TradeResult<()> {
        let contract = to_contract(symbol);
        let result = self
            .session
            .transport()
            .update_leverage(self.session.settle(), &contract, leverage)
            .await;

        match result {
            Ok(_) => {
                info!("[gate-td] {contract} leverage set to {leverage}x");
                tokio::time::sleep(self.options.leverage_cooldown).await;
                Ok(())
            }
            Err(e) if classify(Operation::Leverage, &e) == ErrorClass::LeverageUnchanged => {
                debug!("[gate-td] {contract} leverage already {leverage}x");
                Ok(())
            }
            Err(e) => {
                let context = format!("set leverage for {contract}");
                Err(to_trade_error(Operation::Leverage, &context, e))
            }
        }
    }

    async fn open_long(
        &self,
        symbol: &str,
        quantity: f64,
        leverage: u32,
    ) -> TradeResult<OrderResult> {
        let side = PositionSide::Long;
        self.open("open long", symbol, side, quantity, leverage).await
    }

    async fn open_short(
        &self,
        symbol: &str,
        quantity: f64,
        leverage: u32,
    ) -> TradeResult<OrderResult> {
        let side = PositionSide::Short;
        self.open("open short", symbol, side, quantity, leverage).await
    }

    async fn close_long(&self, symbol: &str, quantity: f64) -> TradeResult<OrderResult> {
        let side = PositionSide::Long;
        self.close("close long", symbol, side, quantity).await
    }

    async fn close_short(&self, symbol: &str, quantity: f64) -> TradeResult<OrderResult> {
        let side = PositionSide::Short;
        self.close("close short", symbol, side, quantity).await
    }

    async fn cancel_all_orders(&self, symbol: &str) -> TradeResult<()> {
        let contract = to_contract(symbol);
        let result = self
            .session
            .transport()
            .cancel_orders(self.session.settle(), &contract)
            .await;

        match result {
            Ok(cancelled) => {
                let count = cancelled.len();
                if count > 0 {
                    info!("[gate-td] cancelled {count} order(s) on {contract}");
                }
                Ok(())
            }
            Err(e) if classify(Operation::CancelOrders, &e).is_already_satisfied() => {
                debug!("[gate-td] no resting orders on {contract}");
                Ok(())
            }
            Err(e) => {
                let context = format!("cancel orders on {contract}");
                Err(to_trade_error(Operation::CancelOrders, &context, e))
            }
        }
    }

    async fn get_market_price(&self, symbol: &str) -> TradeResult<f64> {
        let contract = to_contract(symbol);
        let context = format!("fetch ticker for {contract}");
        let tickers = self
            .session
            .transport()
            .list_tickers(self.session.settle(), Some(&contract))
            .await
            .map_err(|e| to_trade_error(Operation::Ticker, &context, e))?;

        let unavailable = |reason: String| TradeError::PriceUnavailable {
            symbol: to_symbol(&contract),
            reason,
        };
        let ticker = tickers
            .first()
            .ok_or_else(|| unavailable("no ticker returned".into()))?;
        ticker
            .last
            .trim()
            .parse::<f64>()
            .map_err(|_| unavailable(format!("unparseable last price {:?}", ticker.last)))
    }

    async fn set_stop_loss(
        &self,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        price: f64,
    ) -> TradeResult<()> {
        let kind = ProtectionKind::StopLoss;
        self.protect(kind, symbol, side, quantity, price).await
    }

    async fn set_take_profit(
        &self,
        symbol: &str,
        side: PositionSide,
        quantity: f64,
        price: f64,
    ) -> TradeResult<()> {
        let kind = ProtectionKind::TakeProfit;
        self.protect(kind, symbol, side, quantity, price).await
    }
}

/// Client tag attached to every order, `t-` plus 24 hex characters.
fn order_tag() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("t-{}", &id[..ORDER_TAG_LEN])
}

/// Map a submission failure, keeping the exchange message verbatim.
///
/// A rejected key still reports as an authentication failure.
fn order_error(
    operation: Operation,
    err: GateApiError,
    wrap: impl FnOnce(String) -> TradeError,
) -> TradeError {
    if classify(operation, &err) == ErrorClass::InvalidKey {
        return to_trade_error(operation, "submit order", err);
    }
    match err.exchange_message() {
        Some(message) => wrap(message.to_string()),
        None => wrap(err.to_string()),
    }
}
