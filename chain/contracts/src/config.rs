//! Ledger configuration

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Ledger behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Reject zero-amount deposits and withdrawals with `InvalidAmount`.
    /// When disabled they succeed without touching custody or the books.
    pub reject_zero_amounts: bool,
    /// Re-verify ledger total <= custody holdings after every write.
    pub check_conservation_on_write: bool,
    /// Maximum retained events; the oldest are dropped first.
    pub max_event_log: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reject_zero_amounts: true,
            check_conservation_on_write: false,
            max_event_log: 10_000,
        }
    }
}

impl LedgerConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
