//! Identifier types for exchange participants and custodied assets
//!
//! Account IDs use UUID v7 so that they sort chronologically. Asset handles
//! are opaque references to whatever holds the underlying asset (for a token
//! contract, its address).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::IdError;

/// Unique identifier for an account (trader or administrator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to the external custody endpoint of an asset
///
/// The ledger never interprets it; it is only handed back to the custody
/// backend. Leading and trailing whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Create a handle, rejecting empty input.
    pub fn try_new(handle: impl Into<String>) -> Result<Self, IdError> {
        let raw = handle.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyAssetHandle);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetHandle {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<AssetHandle> for String {
    fn from(handle: AssetHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
