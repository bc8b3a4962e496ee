//! Token registry: ticker → asset handle
//!
//! Single source of truth for which assets the exchange accepts. Entries are
//! immutable once registered and are never removed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dex_types::ids::AssetHandle;
use dex_types::ticker::Ticker;
use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// A registered token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub ticker: Ticker,
    pub asset: AssetHandle,
    pub registered_at: DateTime<Utc>,
}

/// Registered tokens, kept in registration order.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: Vec<TokenInfo>,
    index: HashMap<Ticker, usize>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new token.
    ///
    /// A ticker can only be registered once; a second registration is
    /// rejected and the existing entry is left untouched.
    pub fn register(
        &mut self,
        ticker: Ticker,
        asset: AssetHandle,
        now: DateTime<Utc>,
    ) -> Result<&TokenInfo, RegistryError> {
        if self.index.contains_key(&ticker) {
            return Err(RegistryError::DuplicateTicker { ticker });
        }
        let slot = self.tokens.len();
        self.index.insert(ticker.clone(), slot);
        self.tokens.push(TokenInfo {
            ticker,
            asset,
            registered_at: now,
        });
        Ok(&self.tokens[slot])
    }

    /// Look up a ticker.
    pub fn resolve(&self, ticker: &Ticker) -> Result<&TokenInfo, RegistryError> {
        self.index
            .get(ticker)
            .map(|slot| &self.tokens[*slot])
            .ok_or_else(|| RegistryError::UnknownToken {
                ticker: ticker.clone(),
            })
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.index.contains_key(ticker)
    }

    /// All tokens in registration order.
    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
