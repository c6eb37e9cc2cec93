//! Authenticated session setup.
//!
//! An [`ExchangeSession`] is built once per adapter: credentials are trimmed
//! and validated, the production or test endpoint is selected, and a single
//! signed transport is created. The session is immutable afterwards and shared
//! read-only by the caches and the order engine.

use std::sync::Arc;
use std::time::Duration;

use perp_core::config::GateConfig;
use perp_core::error::{TradeError, TradeResult};
use tracing::info;

use super::rest::GateRestClient;
use super::transport::FuturesTransport;

/// Validated API credentials.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// Trim both values and reject blanks.
    pub fn new(api_key: &str, secret_key: &str) -> TradeResult<Self> {
        let api_key = api_key.trim();
        let secret_key = secret_key.trim();
        if api_key.is_empty() {
            return Err(TradeError::Credential("API key must not be empty".into()));
        }
        if secret_key.is_empty() {
            return Err(TradeError::Credential("secret key must not be empty".into()));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// First 8 characters of the API key, safe to log.
    pub fn key_prefix(&self) -> &str {
        let key = &self.api_key;
        let end = key.char_indices().nth(8).map_or(key.len(), |(i, _)| i);
        &key[..end]
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials({}...)", self.key_prefix())
    }
}

/// Shared, immutable exchange session.
pub struct ExchangeSession {
    transport: Arc<dyn FuturesTransport>,
    base_url: String,
    settle: String,
}

impl ExchangeSession {
    /// Validate credentials and build the signed REST transport.
    pub fn connect(config: &GateConfig) -> TradeResult<Self> {
        let credentials = Credentials::new(&config.api_key, &config.secret_key)?;
        let key_prefix = credentials.key_prefix().to_string();
        let base_url = config.base_url().to_string();
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = GateRestClient::new(credentials, &base_url, timeout)?;

        let testnet = config.testnet;
        info!("[gate-td] session ready on {base_url} (testnet={testnet}, api key {key_prefix}...)");
        Ok(Self {
            transport: Arc::new(client),
            base_url,
            settle: config.settle.to_ascii_lowercase(),
        })
    }

    /// Build a session over an existing transport.
    pub fn with_transport(
        transport: Arc<dyn FuturesTransport>,
        settle: &str,
        base_url: &str,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            settle: settle.to_ascii_lowercase(),
        }
    }

    pub fn transport(&self) -> &dyn FuturesTransport {
        self.transport.as_ref()
    }

    /// Settlement currency path segment (e.g. `usdt`).
    pub fn settle(&self) -> &str {
        &self.settle
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
