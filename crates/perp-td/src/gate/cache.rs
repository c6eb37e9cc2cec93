//! TTL-bounded cache of account state.
//!
//! Two independent snapshots are cached: the balance and the full position
//! list. Each sits behind its own reader/writer lock. The lock is only held
//! to read or replace an entry, never across the exchange call, so a warm
//! cache serves concurrent readers freely and a refresh blocks readers only
//! for the final write-back.
//!
//! Concurrent misses are not coalesced: every caller that finds the entry
//! stale performs its own fetch and the last write wins.

use std::sync::Arc;
use std::time::Duration;

use perp_core::enums::PositionSide;
use perp_core::error::TradeResult;
use perp_core::symbol::{to_contract, to_symbol};
use perp_core::trading::{BalanceSnapshot, PositionSnapshot};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::classify::{ErrorClass, Operation, classify, to_trade_error};
use super::contracts::ContractMetadataCache;
use super::session::ExchangeSession;
use super::types::{Position, parse_amount};

/// Leverage reported for a position whose leverage field is empty.
const DEFAULT_LEVERAGE: f64 = 10.0;

// ---------------------------------------------------------------------------
// CacheEntry / TtlCache
// ---------------------------------------------------------------------------

/// A cached value and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Valid iff `now - fetched_at < ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

struct Slot<T> {
    entry: Option<CacheEntry<T>>,
    /// Bumped by every invalidation.
    generation: u64,
}

/// Single-slot cache whose entry is replaced wholesale on refresh.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(Slot {
                entry: None,
                generation: 0,
            }),
        }
    }

    /// The cached value and its age, if still fresh.
    pub async fn get(&self) -> Option<(T, Duration)> {
        let slot = self.slot.read().await;
        slot.entry
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| (entry.value.clone(), entry.fetched_at.elapsed()))
    }

    /// Current generation. Read it before fetching and hand it to
    /// [`store`](Self::store) with the result.
    pub async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }

    /// Replace the entry, stamping it with the current time.
    ///
    /// Returns `false` and keeps the slot empty when the cache was
    /// invalidated after `generation` was read.
    pub async fn store(&self, value: T, generation: u64) -> bool {
        let mut slot = self.slot.write().await;
        if slot.generation != generation {
            return false;
        }
        slot.entry = Some(CacheEntry {
            value,
            fetched_at: Instant::now(),
        });
        true
    }

    /// Drop the entry and reject stores from fetches already in flight.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.entry = None;
        slot.generation += 1;
    }
}

// ---------------------------------------------------------------------------
// AccountStateCache
// ---------------------------------------------------------------------------

/// Balance and position snapshots, refreshed through the session on expiry.
pub struct AccountStateCache {
    session: Arc<ExchangeSession>,
    contracts: Arc<ContractMetadataCache>,
    balance: TtlCache<BalanceSnapshot>,
    positions: TtlCache<Vec<PositionSnapshot>>,
}

impl AccountStateCache {
    pub fn new(
        session: Arc<ExchangeSession>,
        contracts: Arc<ContractMetadataCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            session,
            contracts,
            balance: TtlCache::new(ttl),
            positions: TtlCache::new(ttl),
        }
    }

    /// Account balance, served from cache while fresh.
    pub async fn get_balance(&self) -> TradeResult<BalanceSnapshot> {
        if let Some((balance, age)) = self.balance.get().await {
            let age = age.as_secs_f64();
            debug!("[gate-td] balance from cache ({age:.1}s old)");
            return Ok(balance);
        }

        debug!("[gate-td] balance cache stale, fetching account");
        let generation = self.balance.generation().await;
        let account = self
            .session
            .transport()
            .list_account(self.session.settle())
            .await
            .map_err(|e| {
                warn!("[gate-td] fetch account failed: {e}");
                to_trade_error(Operation::Account, "fetch account", e)
            })?;

        let total = parse_amount(&account.total);
        let snapshot = BalanceSnapshot::from_total_equity(
            total,
            parse_amount(&account.unrealised_pnl),
            parse_amount(&account.available),
        );
        let wallet = snapshot.wallet_balance;
        let available = snapshot.available_balance;
        info!("[gate-td] account: equity={total:.2} wallet={wallet:.2} available={available:.2}");

        if !self.balance.store(snapshot, generation).await {
            debug!("[gate-td] balance invalidated during fetch, not cached");
        }
        Ok(snapshot)
    }

    /// All open positions, served from cache while fresh.
    ///
    /// A refresh walks every contract of the settlement currency. Contracts
    /// without a position are skipped; a failure on one contract is logged
    /// and skipped so the rest of the list is still returned.
    pub async fn get_positions(&self) -> TradeResult<Vec<PositionSnapshot>> {
        if let Some((positions, age)) = self.positions.get().await {
            let age = age.as_secs_f64();
            debug!("[gate-td] positions from cache ({age:.1}s old)");
            return Ok(positions);
        }

        debug!("[gate-td] position cache stale, scanning contracts");
        let generation = self.positions.generation().await;
        let transport = self.session.transport();
        let settle = self.session.settle();
        let contracts = transport
            .list_contracts(settle)
            .await
            .map_err(|e| to_trade_error(Operation::Contracts, "list contracts", e))?;

        let mut result = Vec::new();
        for contract in &contracts {
            let position = match transport.get_position(settle, &contract.name).await {
                Ok(position) => position,
                Err(e) => {
                    if classify(Operation::Position, &e) != ErrorClass::PositionNotFound {
                        let name = &contract.name;
                        warn!("[gate-td] fetch position for {name} failed, skipping: {e}");
                    }
                    continue;
                }
            };
            if let Some(snapshot) = position_snapshot(&position) {
                result.push(snapshot);
            }
        }

        let metas = contracts.iter().map(|c| c.to_metadata());
        self.contracts.insert_many(metas).await;
        let (open, scanned) = (result.len(), contracts.len());
        debug!("[gate-td] {open} open position(s) across {scanned} contract(s)");

        if !self.positions.store(result.clone(), generation).await {
            debug!("[gate-td] positions invalidated during scan, not cached");
        }
        Ok(result)
    }

    /// The open position for `symbol` on `side`, if any.
    pub async fn find_position(
        &self,
        symbol: &str,
        side: PositionSide,
    ) -> TradeResult<Option<PositionSnapshot>> {
        let wanted = to_symbol(&to_contract(symbol));
        let matches = |p: &PositionSnapshot| p.symbol == wanted && p.side == side;
        let positions = self.get_positions().await?;
        Ok(positions.into_iter().find(matches))
    }

    /// Drop both snapshots so the next read goes to the exchange. A refresh
    /// already in flight does not repopulate them.
    pub async fn invalidate(&self) {
        self.balance.invalidate().await;
        self.positions.invalidate().await;
    }
}

/// Map an exchange position to a snapshot; `None` when flat.
fn position_snapshot(position: &Position) -> Option<PositionSnapshot> {
    let side = PositionSide::from_signed_size(position.size)?;
    let leverage = match position.leverage.trim().parse::<f64>() {
        Ok(lev) if lev > 0.0 => lev,
        _ => DEFAULT_LEVERAGE,
    };

    Some(PositionSnapshot {
        symbol: to_symbol(&position.contract),
        side,
        quantity: position.size.unsigned_abs() as f64,
        entry_price: parse_amount(&position.entry_price),
        mark_price: parse_amount(&position.mark_price),
        unrealized_profit: parse_amount(&position.unrealised_pnl),
        leverage,
        liquidation_price: parse_amount(&position.liq_price),
        margin: parse_amount(&position.margin),
    })
}
