//! # perp-core
//!
//! Core crate for the futures trading adapter, providing:
//!
//! - **Types** (`types`) — position/balance snapshots, order records, enums,
//!   canonical ↔ exchange symbol conversion
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — the `TradeError` taxonomy via thiserror
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
