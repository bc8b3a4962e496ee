//! Token registry and custodial balance ledger
//!
//! This crate implements the accounting layer of the exchange: which tokens
//! are accepted, how much of each token every account may withdraw, and the
//! coordination with the external custody mechanism that actually holds the
//! assets.
//!
//! # Modules
//! - `errors`: Registry, ledger and config error types
//! - `events`: Ledger events emitted on successful operations
//! - `security`: Admin access control
//! - `registry`: Ticker → asset handle mapping
//! - `custody`: Asset custody port and in-memory backend
//! - `config`: Ledger configuration
//! - `ledger`: Deposits, withdrawals, balance queries, conservation checks
//!
//! # Version
//! v0.1.0

pub mod config;
pub mod custody;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod security;

pub use config::LedgerConfig;
pub use custody::{AssetCustody, CustodyError, InMemoryCustody};
pub use errors::LedgerError;
pub use ledger::{BalanceKey, Ledger, Receipt};

/// Ledger ABI version, frozen after release
pub const LEDGER_ABI_VERSION: &str = "1.0.0";
