//! Fixed-width token symbols
//!
//! A ticker occupies at most [`TICKER_CAPACITY`] bytes, the width of a
//! `bytes32` symbol. Comparison is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TickerError;

/// Maximum encoded length of a ticker in bytes
pub const TICKER_CAPACITY: usize = 32;

/// Symbolic identifier for a registered asset (e.g. "DAI", "ZRX")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Build a ticker from text. Surrounding whitespace is trimmed; the
    /// remainder must be 1..=32 printable ASCII characters.
    pub fn new(symbol: &str) -> Result<Self, TickerError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }
        if let Some(ch) = trimmed.chars().find(|c| !c.is_ascii_graphic()) {
            return Err(TickerError::InvalidCharacter { ch });
        }
        if trimmed.len() > TICKER_CAPACITY {
            return Err(TickerError::TooLong {
                len: trimmed.len(),
                max: TICKER_CAPACITY,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Decode a NUL-padded fixed-width symbol.
    pub fn from_bytes32(bytes: [u8; TICKER_CAPACITY]) -> Result<Self, TickerError> {
        let end = bytes
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        let symbol = &bytes[..end];
        if let Some(byte) = symbol.iter().find(|b| !b.is_ascii_graphic()) {
            return Err(TickerError::InvalidCharacter { ch: char::from(*byte) });
        }
        // Every byte is ASCII at this point.
        let text: String = symbol.iter().map(|b| char::from(*b)).collect();
        Self::new(&text)
    }

    /// Encode as a NUL-padded fixed-width symbol.
    pub fn to_bytes32(&self) -> [u8; TICKER_CAPACITY] {
        let mut out = [0u8; TICKER_CAPACITY];
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = TickerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_creation() {
        let ticker = Ticker::new("DAI").unwrap();
        assert_eq!(ticker.as_str(), "DAI");
        assert_eq!(ticker.to_string(), "DAI");
    }

    #[test]
    fn test_ticker_trims_whitespace() {
        assert_eq!(Ticker::new("  BAT ").unwrap(), Ticker::new("BAT").unwrap());
    }

    #[test]
    fn test_ticker_is_case_sensitive() {
        assert_ne!(Ticker::new("dai").unwrap(), Ticker::new("DAI").unwrap());
    }

    #[test]
    fn test_ticker_empty_rejected() {
        assert_eq!(Ticker::new(""), Err(TickerError::Empty));
        assert_eq!(Ticker::new("   "), Err(TickerError::Empty));
    }

    #[test]
    fn test_ticker_too_long_rejected() {
        let long = "X".repeat(33);
        assert_eq!(
            Ticker::new(&long),
            Err(TickerError::TooLong { len: 33, max: 32 })
        );
        assert!(Ticker::new(&"X".repeat(32)).is_ok());
    }

    #[test]
    fn test_ticker_inner_space_rejected() {
        assert_eq!(
            Ticker::new("WR ONG"),
            Err(TickerError::InvalidCharacter { ch: ' ' })
        );
    }

    #[test]
    fn test_ticker_non_ascii_rejected() {
        assert!(matches!(
            Ticker::new("DAÏ"),
            Err(TickerError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_bytes32_strips_padding() {
        let mut raw = [0u8; TICKER_CAPACITY];
        raw[..3].copy_from_slice(b"REP");
        let ticker = Ticker::from_bytes32(raw).unwrap();
        assert_eq!(ticker.as_str(), "REP");
        assert_eq!(ticker.to_bytes32(), raw);
    }

    #[test]
    fn test_bytes32_all_zero_is_empty() {
        assert_eq!(
            Ticker::from_bytes32([0u8; TICKER_CAPACITY]),
            Err(TickerError::Empty)
        );
    }

    #[test]
    fn test_bytes32_embedded_nul_rejected() {
        let mut raw = [0u8; TICKER_CAPACITY];
        raw[0] = b'Z';
        raw[2] = b'X';
        assert_eq!(
            Ticker::from_bytes32(raw),
            Err(TickerError::InvalidCharacter { ch: '\0' })
        );
    }

    #[test]
    fn test_ticker_serialization() {
        let ticker = Ticker::new("ZRX").unwrap();
        let json = serde_json::to_string(&ticker).unwrap();
        assert_eq!(json, "\"ZRX\"");
        let back: Ticker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ticker);
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }
}
