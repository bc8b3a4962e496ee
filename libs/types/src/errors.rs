//! Validation errors for exchange value types

use thiserror::Error;

/// Ticker construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("Ticker must not be empty")]
    Empty,

    #[error("Ticker too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("Ticker contains invalid character {ch:?}")]
    InvalidCharacter { ch: char },
}

/// Amount conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount must not be negative: {value}")]
    Negative { value: String },

    #[error("Amount {value} has more than {decimals} decimal places")]
    TooPrecise { value: String, decimals: u32 },

    #[error("Amount out of range: {value}")]
    OutOfRange { value: String },

    #[error("Invalid amount literal: {value}")]
    Parse { value: String },
}

/// Identifier validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Asset handle must not be empty")]
    EmptyAssetHandle,
}
