//! Integer base-unit amounts
//!
//! Balances are counted in the smallest unit of a token (wei-like), so all
//! ledger arithmetic is exact integer arithmetic. `rust_decimal` is only used
//! at the edge, to convert human quantities such as "100.5" DAI into base
//! units and back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AmountError;

/// Decimal places of an 18-decimal token (ether-style)
pub const DEFAULT_DECIMALS: u32 = 18;

/// Non-negative quantity in base units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(base_units: u128) -> Self {
        Self(base_units)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Scale a human quantity into base units: `value * 10^decimals`.
    ///
    /// Fails if the value is negative, carries more fractional digits than
    /// the token supports, or does not fit in 128 bits.
    pub fn from_units(value: Decimal, decimals: u32) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative {
                value: value.to_string(),
            });
        }
        let value = value.normalize();
        let scale = value.scale();
        if scale > decimals {
            return Err(AmountError::TooPrecise {
                value: value.to_string(),
                decimals,
            });
        }
        let out_of_range = || AmountError::OutOfRange {
            value: value.to_string(),
        };
        let mantissa = u128::try_from(value.mantissa()).map_err(|_| out_of_range())?;
        let factor = 10u128.checked_pow(decimals - scale).ok_or_else(out_of_range)?;
        mantissa
            .checked_mul(factor)
            .map(Amount)
            .ok_or_else(out_of_range)
    }

    /// Parse a human quantity literal ("1000", "0.25") into base units.
    pub fn parse_units(literal: &str, decimals: u32) -> Result<Self, AmountError> {
        let value = Decimal::from_str_exact(literal.trim()).map_err(|_| AmountError::Parse {
            value: literal.to_string(),
        })?;
        Self::from_units(value, decimals)
    }

    /// Convert base units back into a human quantity.
    ///
    /// Returns `None` when the amount exceeds the 96-bit decimal mantissa or
    /// `decimals` exceeds the decimal scale limit.
    pub fn to_units(self, decimals: u32) -> Option<Decimal> {
        let mantissa = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(mantissa, decimals)
            .ok()
            .map(|d| d.normalize())
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Amount).map_err(|_| AmountError::Parse {
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
