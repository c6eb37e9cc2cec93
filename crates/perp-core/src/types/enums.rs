//! Enumerations shared by the trading adapter and its callers.
//!
//! The wire encodings (`as_str`, integer codes) follow the Gate.io futures
//! API v4, while the variants themselves stay exchange-agnostic so the
//! controller never sees raw exchange codes.

use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position side
// ---------------------------------------------------------------------------

/// Side of an open futures position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Derive the side from an exchange signed contract size.
    ///
    /// Returns `None` for a zero size (no open position).
    pub fn from_signed_size(size: i64) -> Option<Self> {
        match size {
            s if s > 0 => Some(Self::Long),
            s if s < 0 => Some(Self::Short),
            _ => None,
        }
    }

    /// Direction of the order that opens (or increases) a position on this side.
    pub fn opening_direction(self) -> Direction {
        match self {
            Self::Long => Direction::Buy,
            Self::Short => Direction::Sell,
        }
    }

    /// Direction of the order that reduces a position on this side.
    pub fn closing_direction(self) -> Direction {
        match self {
            Self::Long => Direction::Sell,
            Self::Short => Direction::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionSide {
    type Err = anyhow::Error;

    /// Accepts `long`/`short` in any case (controllers send `LONG`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(anyhow!("unknown position side: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Buy or sell direction.
///
/// The exchange has no side field: direction is the sign of the order size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Apply this direction to an unsigned contract count.
    pub fn signed(self, contracts: i64) -> i64 {
        match self {
            Self::Buy => contracts,
            Self::Sell => -contracts,
        }
    }
}

// ---------------------------------------------------------------------------
// Time in force
// ---------------------------------------------------------------------------

/// Order time-in-force. Every order this adapter sends is immediate-or-cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Ioc,
}

// ---------------------------------------------------------------------------
// Trigger orders
// ---------------------------------------------------------------------------

/// Comparison applied between the reference price and the trigger price.
///
/// Discriminants are the exchange's `rule` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TriggerRule {
    /// Fires when price >= trigger.
    GreaterOrEqual = 1,
    /// Fires when price <= trigger.
    LessOrEqual = 2,
}

impl TriggerRule {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Reference price a trigger order watches.
///
/// Discriminants are the exchange's `price_type` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum TriggerPriceType {
    Last = 0,
    #[default]
    Mark = 1,
    Index = 2,
}

impl TriggerPriceType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Protective order flavour implemented with a trigger order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectionKind {
    StopLoss,
    TakeProfit,
}

impl ProtectionKind {
    /// Trigger rule for protecting a position on `side`.
    ///
    /// A stop-loss fires when price moves against the position, a take-profit
    /// when it moves in favour.
    pub fn trigger_rule(self, side: PositionSide) -> TriggerRule {
        match (self, side) {
            (Self::StopLoss, PositionSide::Long) => TriggerRule::LessOrEqual,
            (Self::StopLoss, PositionSide::Short) => TriggerRule::GreaterOrEqual,
            (Self::TakeProfit, PositionSide::Long) => TriggerRule::GreaterOrEqual,
            (Self::TakeProfit, PositionSide::Short) => TriggerRule::LessOrEqual,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
        }
    }
}

impl std::fmt::Display for ProtectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
