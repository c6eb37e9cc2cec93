//! Signed REST client for the Gate.io futures API v4.
//!
//! # REST endpoints (settle = `usdt`)
//!
//! | Operation         | Method | Path                                         |
//! |-------------------|--------|----------------------------------------------|
//! | Account           | GET    | `/futures/usdt/accounts`                     |
//! | Contracts         | GET    | `/futures/usdt/contracts`                    |
//! | Single contract   | GET    | `/futures/usdt/contracts/{contract}`         |
//! | Position          | GET    | `/futures/usdt/positions/{contract}`         |
//! | Update leverage   | POST   | `/futures/usdt/positions/{contract}/leverage`|
//! | Create order      | POST   | `/futures/usdt/orders`                       |
//! | Cancel all orders | DELETE | `/futures/usdt/orders?contract=...`          |
//! | Trigger order     | POST   | `/futures/usdt/price_orders`                 |
//! | Tickers           | GET    | `/futures/usdt/tickers`                      |

use std::time::Duration;

use async_trait::async_trait;
use perp_core::error::{TradeError, TradeResult};
use perp_core::trading::OrderRequest;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::auth;
use super::session::Credentials;
use super::transport::{ApiResult, FuturesTransport, GateApiError};
use super::types::{
    Contract, ErrorBody, FuturesAccount, FuturesOrderResponse, Position, PriceTriggeredOrder,
    Ticker, TriggerOrderResponse,
};

/// Gate.io futures REST client.
///
/// Holds one HTTP connection pool and one credential pair for its lifetime;
/// every request is signed with the same key.
pub struct GateRestClient {
    http: reqwest::Client,
    credentials: Credentials,
    /// Base URL without trailing slash (e.g. `https://api.gateio.ws/api/v4`).
    base_url: String,
    /// Path part of the base URL, signed as part of every request (`/api/v4`).
    path_prefix: String,
}

impl GateRestClient {
    /// Create a client for `base_url` (must include the `/api/v4` prefix).
    pub fn new(credentials: Credentials, base_url: &str, timeout: Duration) -> TradeResult<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| TradeError::Config(format!("invalid REST url '{base_url}': {e}")))?;
        let path_prefix = parsed.path().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TradeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            path_prefix,
        })
    }

    /// Send one signed request and decode the JSON response.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<String>,
    ) -> ApiResult<T> {
        let query = auth::encode_query(params);
        let body = body.unwrap_or_default();
        let timestamp = auth::current_timestamp_secs();
        let signature = auth::sign_request(
            self.credentials.secret_key(),
            method.as_str(),
            &format!("{}{path}", self.path_prefix),
            &query,
            &body,
            &timestamp,
        );

        let mut url = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        debug!("[gate-td] {method} {path} {query}");

        let mut req = self
            .http
            .request(method, &url)
            .header("Accept", "application/json")
            .header("KEY", self.credentials.api_key())
            .header("Timestamp", &timestamp)
            .header("SIGN", signature);
        if !body.is_empty() {
            req = req.header("Content-Type", "application/json").body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &text));
        }
        serde_json::from_str(&text).map_err(|e| {
            let body = snippet(&text);
            GateApiError::Decode(format!("{e}: {body}"))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        self.request(Method::GET, path, params, None).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_string(body).map_err(|e| GateApiError::Decode(e.to_string()))?;
        self.request(Method::POST, path, &[], Some(body)).await
    }
}

/// Turn a non-2xx body into a structured error.
///
/// Bodies that are not the usual `{label, message}` object keep their raw
/// text as the message under an `HTTP_<status>` label.
fn decode_error(status: u16, text: &str) -> GateApiError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) if !body.label.is_empty() => GateApiError::Exchange {
            status,
            label: body.label,
            message: body.message,
        },
        _ => GateApiError::Exchange {
            status,
            label: format!("HTTP_{status}"),
            message: snippet(text),
        },
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[async_trait]
impl FuturesTransport for GateRestClient {
    async fn list_account(&self, settle: &str) -> ApiResult<FuturesAccount> {
        self.get(&format!("/futures/{settle}/accounts"), &[]).await
    }

    async fn list_contracts(&self, settle: &str) -> ApiResult<Vec<Contract>> {
        self.get(&format!("/futures/{settle}/contracts"), &[]).await
    }

    async fn get_contract(&self, settle: &str, contract: &str) -> ApiResult<Contract> {
        let path = format!("/futures/{settle}/contracts/{contract}");
        self.get(&path, &[]).await
    }

    async fn get_position(&self, settle: &str, contract: &str) -> ApiResult<Position> {
        let path = format!("/futures/{settle}/positions/{contract}");
        self.get(&path, &[]).await
    }

    async fn update_leverage(
        &self,
        settle: &str,
        contract: &str,
        leverage: u32,
    ) -> ApiResult<Position> {
        let path = format!("/futures/{settle}/positions/{contract}/leverage");
        let params = [("leverage", leverage.to_string())];
        self.request(Method::POST, &path, &params, None).await
    }

    async fn create_order(
        &self,
        settle: &str,
        order: &OrderRequest,
    ) -> ApiResult<FuturesOrderResponse> {
        let path = format!("/futures/{settle}/orders");
        self.post_json(&path, order).await
    }

    async fn cancel_orders(
        &self,
        settle: &str,
        contract: &str,
    ) -> ApiResult<Vec<FuturesOrderResponse>> {
        let path = format!("/futures/{settle}/orders");
        let params = [("contract", contract.to_string())];
        self.request(Method::DELETE, &path, &params, None).await
    }

    async fn create_trigger_order(
        &self,
        settle: &str,
        order: &PriceTriggeredOrder,
    ) -> ApiResult<TriggerOrderResponse> {
        let path = format!("/futures/{settle}/price_orders");
        self.post_json(&path, order).await
    }

    async fn list_tickers(&self, settle: &str, contract: Option<&str>) -> ApiResult<Vec<Ticker>> {
        let path = format!("/futures/{settle}/tickers");
        let params: Vec<(&str, String)> = contract
            .map(|c| ("contract", c.to_string()))
            .into_iter()
            .collect();
        self.get(&path, &params).await
    }
}
