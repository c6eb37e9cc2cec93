//! Configuration parsing for the trading adapter.
//!
//! Settings come from a single JSON file. Only the credentials need to be
//! given; every other field has a production default.
//!
//! # Example config
//!
//! ```json
//! {
//!   "module": { "module_name": "gate_td", "log_path": "/tmp/log" },
//!   "gate": {
//!     "api_key": "...",
//!     "secret_key": "...",
//!     "testnet": false
//!   }
//! }
//! ```

use serde::Deserialize;

use crate::error::TradeError;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module metadata (name, log path).
    #[serde(default)]
    pub module: Option<ModuleMeta>,

    /// Exchange adapter settings.
    pub gate: GateConfig,
}

impl AppConfig {
    /// Returns the module name, defaulting to `"gate_td"`.
    pub fn module_name(&self) -> String {
        self.module
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "gate_td".into())
    }

    /// Returns the log path.
    pub fn log_path(&self) -> Option<String> {
        self.module.as_ref().and_then(|m| m.log_path.clone())
    }
}

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

/// Configuration for the Gate.io futures adapter.
#[derive(Clone, Deserialize)]
pub struct GateConfig {
    /// API key. May be left empty in the file and supplied via environment.
    #[serde(default)]
    pub api_key: String,

    /// API secret (HMAC-SHA512 signing).
    #[serde(default)]
    pub secret_key: String,

    /// Use the test network instead of production.
    #[serde(default)]
    pub testnet: bool,

    /// Settlement currency of the traded contracts.
    #[serde(default = "default_settle")]
    pub settle: String,

    // -- REST base URLs --
    /// Production REST API base URL (including `/api/v4`).
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Test-network REST API base URL.
    #[serde(default = "default_testnet_rest_url")]
    pub testnet_rest_url: String,

    // -- Timing --
    /// Lifetime of cached balance and position snapshots, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Wait after a genuine leverage change, in seconds.
    #[serde(default = "default_leverage_cooldown")]
    pub leverage_cooldown_secs: u64,

    /// Lifetime of stop-loss / take-profit trigger orders, in seconds.
    #[serde(default = "default_trigger_expiration")]
    pub trigger_expiration_secs: u64,

    /// HTTP request timeout, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GateConfig {
    /// Config with the given credentials and all defaults.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>, testnet: bool) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            testnet,
            settle: default_settle(),
            rest_url: default_rest_url(),
            testnet_rest_url: default_testnet_rest_url(),
            cache_ttl_secs: default_cache_ttl(),
            leverage_cooldown_secs: default_leverage_cooldown(),
            trigger_expiration_secs: default_trigger_expiration(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// REST base URL selected by the `testnet` flag.
    pub fn base_url(&self) -> &str {
        if self.testnet {
            &self.testnet_rest_url
        } else {
            &self.rest_url
        }
    }
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("testnet", &self.testnet)
            .field("settle", &self.settle)
            .field("rest_url", &self.base_url())
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("leverage_cooldown_secs", &self.leverage_cooldown_secs)
            .field("trigger_expiration_secs", &self.trigger_expiration_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Default helpers (used by serde)
// ---------------------------------------------------------------------------

fn default_settle() -> String {
    "usdt".into()
}

fn default_rest_url() -> String {
    "https://api.gateio.ws/api/v4".into()
}

fn default_testnet_rest_url() -> String {
    "https://api-testnet.gateapi.io/api/v4".into()
}

fn default_cache_ttl() -> u64 {
    15
}

fn default_leverage_cooldown() -> u64 {
    3
}

fn default_trigger_expiration() -> u64 {
    30 * 24 * 60 * 60
}

fn default_request_timeout() -> u64 {
    30
}

/// Parse a JSON config string.
pub fn parse_config(content: &str) -> Result<AppConfig, TradeError> {
    serde_json::from_str(content).map_err(|e| TradeError::Config(e.to_string()))
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_config(&content)?)
}
