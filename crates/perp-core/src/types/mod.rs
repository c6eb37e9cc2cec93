//! Core data types and enums shared across the workspace.
//!
//! Everything here is exchange-agnostic: canonical symbols, typed account
//! snapshots, and order records. Exchange-specific wire formats live in the
//! trading crate.

pub mod enums;
pub mod symbol;
pub mod trading;

pub use enums::*;
pub use symbol::*;
pub use trading::*;
