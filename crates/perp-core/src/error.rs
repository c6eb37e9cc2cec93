//! Typed error definitions for the trading adapter.
//!
//! [`TradeError`] is what every adapter operation returns. Exchange
//! rejections keep the exchange's own message so callers can show it
//! verbatim; a short explanation is prepended by the `Display` impl.
//!
//! Two outcomes that look like errors on the wire are *not* represented here:
//! "nothing to cancel" / "leverage already set" resolve to success, and a
//! failed contract-metadata lookup during formatting only logs a warning.

use thiserror::Error;

use crate::enums::{PositionSide, ProtectionKind};

/// Domain errors surfaced by the trading adapter.
#[derive(Debug, Error)]
pub enum TradeError {
    /// API key or secret missing or blank. Raised only at construction.
    #[error("credential error: {0}")]
    Credential(String),

    /// The exchange rejected the API key.
    #[error(
        "authentication failed: check that 1) the API key is correct, \
         2) the secret key is correct, 3) the key has futures trading permission ({message})"
    )]
    Authentication {
        /// Exchange message.
        message: String,
    },

    /// A close was requested but no matching open position exists.
    #[error("no open {side} position for {symbol}")]
    PositionNotFound { symbol: String, side: PositionSide },

    /// Order submission rejected.
    #[error("{action} failed: {message}")]
    Order {
        /// What was attempted, e.g. `"open long"`.
        action: &'static str,
        message: String,
    },

    /// Trigger (stop-loss / take-profit) order submission rejected.
    #[error("setting {kind} failed: {message}")]
    TriggerOrder {
        kind: ProtectionKind,
        message: String,
    },

    /// No usable price for the symbol.
    #[error("price unavailable for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    /// Any other exchange rejection.
    #[error("{context} failed: [{label}] {message}")]
    Exchange {
        context: String,
        label: String,
        message: String,
    },

    /// Network or decoding failure below the exchange API.
    #[error("{context} failed: {message}")]
    Transport { context: String, message: String },

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),
}

impl TradeError {
    /// Whether this is a [`TradeError::PositionNotFound`].
    pub fn is_position_not_found(&self) -> bool {
        matches!(self, Self::PositionNotFound { .. })
    }
}

/// Convenience alias used throughout the adapter.
pub type TradeResult<T> = Result<T, TradeError>;
