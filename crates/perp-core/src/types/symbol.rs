//! Conversion between canonical symbols and exchange contract names.
//!
//! The controller uses concatenated symbols (`BTCUSDT`), while the futures
//! venue names contracts with an underscore before the settlement asset
//! (`BTC_USDT`). Conversion is suffix-based and case-insensitive; anything
//! outside the `*USDT` family passes through upper-cased.

/// Quote/settlement asset of the supported symbol family.
pub const QUOTE_ASSET: &str = "USDT";

/// Convert a canonical symbol to an exchange contract name.
///
/// Already-underscored input is returned upper-cased, so repeated
/// normalization is idempotent.
///
/// ```
/// use perp_core::symbol::to_contract;
/// assert_eq!(to_contract("btcusdt"), "BTC_USDT");
/// assert_eq!(to_contract("ETH_USDT"), "ETH_USDT");
/// ```
pub fn to_contract(symbol: &str) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();
    if symbol.contains('_') {
        return symbol;
    }
    match symbol.strip_suffix(QUOTE_ASSET) {
        Some(base) if !base.is_empty() => format!("{base}_{QUOTE_ASSET}"),
        _ => symbol,
    }
}

/// Convert an exchange contract name to a canonical symbol.
///
/// ```
/// use perp_core::symbol::to_symbol;
/// assert_eq!(to_symbol("eth_usdt"), "ETHUSDT");
/// ```
pub fn to_symbol(contract: &str) -> String {
    contract.trim().to_ascii_uppercase().replace('_', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_to_contract() {
        assert_eq!(to_contract("BTCUSDT"), "BTC_USDT");
        assert_eq!(to_contract("1000pepeusdt"), "1000PEPE_USDT");
    }

    #[test]
    fn contract_to_canonical() {
        assert_eq!(to_symbol("BTC_USDT"), "BTCUSDT");
        assert_eq!(to_symbol("ETH_USDT"), "ETHUSDT");
    }

    #[test]
    fn passthrough_outside_family() {
        assert_eq!(to_contract("btcusd"), "BTCUSD");
        assert_eq!(to_contract("USDT"), "USDT");
    }

    #[test]
    fn normalization_is_idempotent() {
        for s in ["BTCUSDT", "ethusdt", "SolUsdt", "1000SHIBUSDT", "XUSDT"] {
            let once = to_contract(s);
            assert_eq!(to_contract(&to_symbol(&once)), once, "symbol {s}");
            assert_eq!(to_contract(&once), once);
        }
    }
}
