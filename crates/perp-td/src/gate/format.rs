//! Quantity and price formatting against contract trading rules.
//!
//! The controller works in float quantities; the exchange trades whole
//! contracts. A quantity is clamped up to the contract minimum, rounded to
//! an integer and rendered with the contract's precision (always 0 here).
//! When the contract's rules cannot be fetched the formatter degrades to a
//! plain rounding and logs a warning instead of failing the order.

use std::sync::Arc;

use perp_core::symbol::to_contract;
use perp_core::trading::ContractMetadata;
use tracing::warn;

use super::contracts::ContractMetadataCache;

/// Decimals used for a price when the contract's tick size is unknown.
const FALLBACK_PRICE_DECIMALS: usize = 8;

/// Formats controller quantities and prices into exchange representation.
pub struct QuantityFormatter {
    contracts: Arc<ContractMetadataCache>,
}

impl QuantityFormatter {
    pub fn new(contracts: Arc<ContractMetadataCache>) -> Self {
        Self { contracts }
    }

    /// Exchange quantity string for `quantity` of `symbol`.
    ///
    /// Never fails: a quantity below the minimum becomes the minimum, and a
    /// metadata lookup failure falls back to rounding to whole contracts.
    pub async fn format_quantity(&self, symbol: &str, quantity: f64) -> String {
        let contract = to_contract(symbol);
        match self.contracts.get(&contract).await {
            Ok(meta) => format_quantity_with(&meta, quantity),
            Err(e) => {
                warn!("[gate-td] no rules for {contract}, rounding to whole contracts: {e}");
                format!("{:.0}", quantity.max(0.0).round())
            }
        }
    }

    /// Signed-size magnitude to submit for `quantity` of `symbol`.
    pub async fn contract_count(&self, symbol: &str, quantity: f64) -> i64 {
        let formatted = self.format_quantity(symbol, quantity).await;
        formatted
            .parse::<i64>()
            .unwrap_or_else(|_| quantity.max(0.0).round() as i64)
    }

    /// Trigger-price string for `price` of `symbol`, snapped to the tick.
    pub async fn format_price(&self, symbol: &str, price: f64) -> String {
        let contract = to_contract(symbol);
        match self.contracts.get(&contract).await {
            Ok(meta) => format_price_with(&meta, price),
            Err(e) => {
                warn!("[gate-td] no rules for {contract}, price at full precision: {e}");
                format!("{price:.prec$}", prec = FALLBACK_PRICE_DECIMALS)
            }
        }
    }
}

/// Clamp to the minimum order size, round to whole contracts and render with
/// the contract precision.
pub fn format_quantity_with(meta: &ContractMetadata, quantity: f64) -> String {
    let quantity = quantity.max(meta.min_order_size).max(0.0).round();
    format!("{quantity:.prec$}", prec = meta.precision as usize)
}

/// Snap `price` to the contract's tick size and render with the tick's
/// decimal count.
pub fn format_price_with(meta: &ContractMetadata, price: f64) -> String {
    if meta.price_tick <= 0.0 {
        return format!("{price:.prec$}", prec = FALLBACK_PRICE_DECIMALS);
    }
    let snapped = (price / meta.price_tick).round() * meta.price_tick;
    let prec = precision_from_step(meta.price_tick) as usize;
    format!("{snapped:.prec$}")
}

/// Number of decimal places of a step size (`0.01` → 2, `1` → 0).
pub fn precision_from_step(step: f64) -> u32 {
    if step <= 0.0 {
        return 0;
    }
    let text = format!("{step:.10}");
    let text = text.trim_end_matches('0');
    match text.split_once('.') {
        Some((_, decimals)) => decimals.len() as u32,
        None => 0,
    }
}
