//! In-memory exchange used by the adapter's unit tests.
//!
//! Serves scripted account/contract/position/ticker data, records every call
//! and every submitted order, and can be told to fail any operation with a
//! given `(label, message)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use perp_core::trading::OrderRequest;

use super::session::ExchangeSession;
use super::transport::{ApiResult, FuturesTransport, GateApiError};
use super::types::{
    Contract, FuturesAccount, FuturesOrderResponse, Position, PriceTriggeredOrder, Ticker,
    TriggerOrderResponse,
};

#[derive(Default)]
pub struct MockState {
    pub account: FuturesAccount,
    pub contracts: Vec<Contract>,
    pub positions: HashMap<String, i64>,
    pub tickers: Vec<Ticker>,
    /// Operation name → scripted `(label, message)` failure.
    pub failures: HashMap<String, (String, String)>,
    /// Contract → scripted position failure.
    pub position_failures: HashMap<String, (String, String)>,
    pub calls: HashMap<String, usize>,
    pub orders: Vec<OrderRequest>,
    pub trigger_orders: Vec<PriceTriggeredOrder>,
    pub leverage_updates: Vec<(String, u32)>,
    pub cancels: Vec<String>,
    next_id: i64,
}

#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A session over this transport with `usdt` settlement.
    pub fn session(self: &Arc<Self>) -> ExchangeSession {
        let transport = Arc::clone(self) as Arc<dyn FuturesTransport>;
        ExchangeSession::with_transport(transport, "usdt", "mock://gate")
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn set_account(&self, total: &str, unrealised_pnl: &str, available: &str) {
        self.state().account = FuturesAccount {
            total: total.into(),
            unrealised_pnl: unrealised_pnl.into(),
            available: available.into(),
            currency: "USDT".into(),
        };
    }

    pub fn add_contract(&self, name: &str, order_size_min: i64, order_price_round: &str) {
        self.state().contracts.push(Contract {
            name: name.into(),
            order_size_min,
            order_size_max: 1_000_000,
            order_price_round: order_price_round.into(),
            ..Default::default()
        });
    }

    pub fn set_position(&self, contract: &str, size: i64) {
        self.state().positions.insert(contract.into(), size);
    }

    pub fn set_ticker(&self, contract: &str, last: &str) {
        self.state().tickers.push(Ticker {
            contract: contract.into(),
            last: last.into(),
            mark_price: last.into(),
        });
    }

    /// Make `operation` (a [`FuturesTransport`] method name) fail.
    pub fn fail(&self, operation: &str, label: &str, message: &str) {
        let failure = (label.to_string(), message.to_string());
        self.state().failures.insert(operation.into(), failure);
    }

    pub fn clear_failure(&self, operation: &str) {
        self.state().failures.remove(operation);
    }

    pub fn fail_position(&self, contract: &str, label: &str, message: &str) {
        let failure = (label.to_string(), message.to_string());
        let contract = contract.to_string();
        self.state().position_failures.insert(contract, failure);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state().calls.get(operation).copied().unwrap_or(0)
    }

    pub fn orders(&self) -> Vec<OrderRequest> {
        self.state().orders.clone()
    }

    pub fn trigger_orders(&self) -> Vec<PriceTriggeredOrder> {
        self.state().trigger_orders.clone()
    }

    pub fn leverage_updates(&self) -> Vec<(String, u32)> {
        self.state().leverage_updates.clone()
    }

    /// Count the call and return the scripted failure for it, if any.
    fn enter(&self, operation: &str) -> ApiResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        *state.calls.entry(operation.to_string()).or_default() += 1;
        if let Some((label, message)) = state.failures.get(operation) {
            return Err(GateApiError::exchange(label.clone(), message.clone()));
        }
        Ok(state)
    }
}

#[async_trait]
impl FuturesTransport for MockTransport {
    async fn list_account(&self, _settle: &str) -> ApiResult<FuturesAccount> {
        Ok(self.enter("list_account")?.account.clone())
    }

    async fn list_contracts(&self, _settle: &str) -> ApiResult<Vec<Contract>> {
        Ok(self.enter("list_contracts")?.contracts.clone())
    }

    async fn get_contract(&self, _settle: &str, contract: &str) -> ApiResult<Contract> {
        let state = self.enter("get_contract")?;
        state
            .contracts
            .iter()
            .find(|c| c.name == contract)
            .cloned()
            .ok_or_else(|| GateApiError::exchange("CONTRACT_NOT_FOUND", "contract not found"))
    }

    async fn get_position(&self, _settle: &str, contract: &str) -> ApiResult<Position> {
        let state = self.enter("get_position")?;
        if let Some((label, message)) = state.position_failures.get(contract) {
            return Err(GateApiError::exchange(label.clone(), message.clone()));
        }
        let size = state
            .positions
            .get(contract)
            .copied()
            .ok_or_else(|| GateApiError::exchange("POSITION_NOT_FOUND", "position not found"))?;
        Ok(Position {
            contract: contract.into(),
            size,
            leverage: "10".into(),
            entry_price: "100".into(),
            mark_price: "101".into(),
            unrealised_pnl: "1".into(),
            liq_price: "50".into(),
            margin: "10".into(),
        })
    }

    async fn update_leverage(
        &self,
        _settle: &str,
        contract: &str,
        leverage: u32,
    ) -> ApiResult<Position> {
        let mut state = self.enter("update_leverage")?;
        state.leverage_updates.push((contract.into(), leverage));
        Ok(Position {
            contract: contract.into(),
            leverage: leverage.to_string(),
            ..Default::default()
        })
    }

    async fn create_order(
        &self,
        _settle: &str,
        order: &OrderRequest,
    ) -> ApiResult<FuturesOrderResponse> {
        let mut state = self.enter("create_order")?;
        state.orders.push(order.clone());
        state.next_id += 1;
        Ok(FuturesOrderResponse {
            id: state.next_id,
            contract: order.contract.clone(),
            size: order.size,
            status: "finished".into(),
            text: order.text.clone(),
        })
    }

    async fn cancel_orders(
        &self,
        _settle: &str,
        contract: &str,
    ) -> ApiResult<Vec<FuturesOrderResponse>> {
        let mut state = self.enter("cancel_orders")?;
        state.cancels.push(contract.into());
        Ok(Vec::new())
    }

    async fn create_trigger_order(
        &self,
        _settle: &str,
        order: &PriceTriggeredOrder,
    ) -> ApiResult<TriggerOrderResponse> {
        let mut state = self.enter("create_trigger_order")?;
        state.trigger_orders.push(order.clone());
        state.next_id += 1;
        Ok(TriggerOrderResponse { id: state.next_id })
    }

    async fn list_tickers(&self, _settle: &str, contract: Option<&str>) -> ApiResult<Vec<Ticker>> {
        let state = self.enter("list_tickers")?;
        let tickers = state
            .tickers
            .iter()
            .filter(|t| contract.is_none_or(|c| t.contract == c))
            .cloned()
            .collect();
        Ok(tickers)
    }
}
