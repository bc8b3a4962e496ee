//! Contract-specific error types
//!
//! Error taxonomy for registry and ledger operations. Every variant is a
//! rejected request; none of them leaves partial state behind.

use dex_types::numeric::Amount;
use dex_types::ticker::Ticker;
use thiserror::Error;

use crate::custody::CustodyError;

/// Token registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("This token does not exist: {ticker}")]
    UnknownToken { ticker: Ticker },

    #[error("Token already registered: {ticker}")]
    DuplicateTicker { ticker: Ticker },
}

/// Balance ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("This token does not exist")]
    UnknownToken { ticker: Ticker },

    #[error("Balance too low")]
    InsufficientBalance {
        ticker: Ticker,
        required: Amount,
        available: Amount,
    },

    #[error("Custody transfer failed: {0}")]
    CustodyTransferFailed(#[from] CustodyError),

    #[error("Unauthorized: caller is not admin")]
    Unauthorized,

    #[error("Token already registered: {ticker}")]
    DuplicateToken { ticker: Ticker },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Conservation violated for {ticker}: ledger holds {ledger}, custody holds {custody}")]
    ConservationViolated {
        ticker: Ticker,
        ledger: Amount,
        custody: Amount,
    },
}

impl From<RegistryError> for LedgerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownToken { ticker } => LedgerError::UnknownToken { ticker },
            RegistryError::DuplicateTicker { ticker } => LedgerError::DuplicateToken { ticker },
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid ledger config: {0}")]
    Parse(String),
}
