//! Read-through cache of per-contract trading rules.
//!
//! Entries are filled on first use (or piggy-backed on a position refresh)
//! and never expire: trading rules are treated as static for the life of the
//! adapter. Concurrent misses on the same contract may each fetch; the
//! results are identical, so the last write wins harmlessly.

use std::collections::HashMap;
use std::sync::Arc;

use perp_core::error::TradeResult;
use perp_core::trading::ContractMetadata;
use tokio::sync::RwLock;
use tracing::debug;

use super::classify::{Operation, to_trade_error};
use super::session::ExchangeSession;

/// Contract metadata keyed by exchange contract name.
pub struct ContractMetadataCache {
    session: Arc<ExchangeSession>,
    entries: RwLock<HashMap<String, ContractMetadata>>,
}

impl ContractMetadataCache {
    pub fn new(session: Arc<ExchangeSession>) -> Self {
        Self {
            session,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Metadata for `contract`, fetching it from the exchange on a miss.
    pub async fn get(&self, contract: &str) -> TradeResult<ContractMetadata> {
        if let Some(meta) = self.entries.read().await.get(contract) {
            return Ok(meta.clone());
        }

        let context = format!("fetch contract {contract}");
        let fetched = self
            .session
            .transport()
            .get_contract(self.session.settle(), contract)
            .await
            .map_err(|e| to_trade_error(Operation::Contracts, &context, e))?;
        let meta = fetched.to_metadata();
        let min_size = meta.min_order_size;
        debug!("[gate-td] cached contract {contract}: min size {min_size}");

        let key = contract.to_string();
        self.entries.write().await.insert(key, meta.clone());
        Ok(meta)
    }

    /// Store entries obtained elsewhere (e.g. from the contract list).
    pub async fn insert_many(&self, metas: impl IntoIterator<Item = ContractMetadata>) {
        let mut entries = self.entries.write().await;
        for meta in metas {
            entries.insert(meta.contract_name.clone(), meta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::mock::MockTransport;
    use crate::gate::types::Contract;

    fn cache(mock: &Arc<MockTransport>) -> ContractMetadataCache {
        ContractMetadataCache::new(Arc::new(mock.session()))
    }

    #[tokio::test]
    async fn fetches_once_then_serves_from_cache() {
        let mock = MockTransport::new();
        mock.add_contract("BTC_USDT", 1, "0.1");
        let cache = cache(&mock);

        let first = cache.get("BTC_USDT").await.unwrap();
        let second = cache.get("BTC_USDT").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.price_tick, 0.1);
        assert_eq!(mock.calls("get_contract"), 1);
    }

    #[tokio::test]
    async fn unknown_contract_is_an_error_and_not_cached() {
        let mock = MockTransport::new();
        let cache = cache(&mock);

        assert!(cache.get("NOPE_USDT").await.is_err());
        assert!(cache.get("NOPE_USDT").await.is_err());
        assert_eq!(mock.calls("get_contract"), 2);
    }

    #[tokio::test]
    async fn inserted_entries_skip_the_network() {
        let mock = MockTransport::new();
        let cache = cache(&mock);
        let contract = Contract {
            name: "ETH_USDT".into(),
            order_size_min: 2,
            ..Default::default()
        };
        cache.insert_many([contract.to_metadata()]).await;

        let meta = cache.get("ETH_USDT").await.unwrap();
        assert_eq!(meta.min_order_size, 2.0);
        assert_eq!(mock.calls("get_contract"), 0);
    }
}
