//! Asset custody port and an in-memory backend
//!
//! The ledger never moves value itself. It asks an [`AssetCustody`]
//! implementation to pull tokens from a trader into exchange custody (on
//! deposit) or push them back out (on withdrawal), and only updates its own
//! books once that call has succeeded.
//!
//! [`InMemoryCustody`] models a set of ERC-20 style token contracts: holder
//! balances, allowances granted to the exchange, and the exchange's own
//! holdings per asset. Failures can be injected to exercise rollback paths.

use std::collections::HashMap;
use std::sync::Arc;

use dex_types::ids::{AccountId, AssetHandle};
use dex_types::numeric::Amount;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors reported by a custody backend. Opaque to the ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CustodyError {
    #[error("Unknown asset: {asset}")]
    UnknownAsset { asset: AssetHandle },

    #[error("Insufficient allowance: required {required}, allowed {allowed}")]
    InsufficientAllowance { required: Amount, allowed: Amount },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },

    #[error("Arithmetic overflow in custody balance")]
    Overflow,

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}

/// External mechanism that actually holds and transfers assets.
pub trait AssetCustody: Send + Sync {
    /// Move `amount` of `asset` from `from`'s external holdings into exchange custody.
    fn pull_into(
        &self,
        asset: &AssetHandle,
        from: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError>;

    /// Move `amount` of `asset` from exchange custody to `to`'s external holdings.
    fn push_from(
        &self,
        asset: &AssetHandle,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError>;

    /// Amount of `asset` currently held by the exchange.
    fn custodied(&self, asset: &AssetHandle) -> Result<Amount, CustodyError>;
}

impl<C: AssetCustody + ?Sized> AssetCustody for Arc<C> {
    fn pull_into(
        &self,
        asset: &AssetHandle,
        from: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        (**self).pull_into(asset, from, amount)
    }

    fn push_from(
        &self,
        asset: &AssetHandle,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        (**self).push_from(asset, to, amount)
    }

    fn custodied(&self, asset: &AssetHandle) -> Result<Amount, CustodyError> {
        (**self).custodied(asset)
    }
}

/// Books of a single token contract.
#[derive(Debug, Default)]
struct TokenBook {
    holders: HashMap<AccountId, Amount>,
    /// owner -> amount the exchange may pull
    allowances: HashMap<AccountId, Amount>,
    exchange: Amount,
}

#[derive(Debug, Default)]
struct CustodyState {
    tokens: HashMap<AssetHandle, TokenBook>,
    fail_pull: Option<String>,
    fail_push: Option<String>,
}

impl CustodyState {
    fn book_mut(&mut self, asset: &AssetHandle) -> Result<&mut TokenBook, CustodyError> {
        self.tokens
            .get_mut(asset)
            .ok_or_else(|| CustodyError::UnknownAsset {
                asset: asset.clone(),
            })
    }
}

/// In-memory token contracts with the exchange as the single custodian.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    state: Mutex<CustodyState>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a token contract. Re-creating an existing asset is a no-op.
    pub fn create_asset(&self, asset: AssetHandle) {
        self.state.lock().tokens.entry(asset).or_default();
    }

    /// Mint `amount` to `to`.
    pub fn faucet(
        &self,
        asset: &AssetHandle,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.lock();
        let book = state.book_mut(asset)?;
        let balance = book.holders.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or(CustodyError::Overflow)?;
        debug!(%asset, account = %to, %amount, "Faucet mint");
        Ok(())
    }

    /// Set the amount the exchange may pull from `owner`.
    pub fn approve(
        &self,
        asset: &AssetHandle,
        owner: AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.lock();
        state.book_mut(asset)?.allowances.insert(owner, amount);
        Ok(())
    }

    /// External balance of `holder`. Zero for unknown assets or holders.
    pub fn balance_of(&self, asset: &AssetHandle, holder: &AccountId) -> Amount {
        self.state
            .lock()
            .tokens
            .get(asset)
            .and_then(|book| book.holders.get(holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Remaining allowance granted by `owner` to the exchange.
    pub fn allowance(&self, asset: &AssetHandle, owner: &AccountId) -> Amount {
        self.state
            .lock()
            .tokens
            .get(asset)
            .and_then(|book| book.allowances.get(owner))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Make the next `pull_into` call fail with `reason`.
    pub fn fail_next_pull(&self, reason: impl Into<String>) {
        self.state.lock().fail_pull = Some(reason.into());
    }

    /// Make the next `push_from` call fail with `reason`.
    pub fn fail_next_push(&self, reason: impl Into<String>) {
        self.state.lock().fail_push = Some(reason.into());
    }
}

impl AssetCustody for InMemoryCustody {
    fn pull_into(
        &self,
        asset: &AssetHandle,
        from: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_pull.take() {
            return Err(CustodyError::Rejected { reason });
        }
        let book = state.book_mut(asset)?;

        let allowed = book.allowances.get(from).copied().unwrap_or(Amount::ZERO);
        let remaining_allowance =
            allowed
                .checked_sub(amount)
                .ok_or(CustodyError::InsufficientAllowance {
                    required: amount,
                    allowed,
                })?;

        let available = book.holders.get(from).copied().unwrap_or(Amount::ZERO);
        let remaining_balance =
            available
                .checked_sub(amount)
                .ok_or(CustodyError::InsufficientFunds {
                    required: amount,
                    available,
                })?;

        let held = book
            .exchange
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;

        // All checks passed; apply together.
        book.allowances.insert(*from, remaining_allowance);
        book.holders.insert(*from, remaining_balance);
        book.exchange = held;
        Ok(())
    }

    fn push_from(
        &self,
        asset: &AssetHandle,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        let mut state = self.state.lock();
        if let Some(reason) = state.fail_push.take() {
            return Err(CustodyError::Rejected { reason });
        }
        let book = state.book_mut(asset)?;

        let held = book
            .exchange
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientFunds {
                required: amount,
                available: book.exchange,
            })?;
        let current = book.holders.get(to).copied().unwrap_or(Amount::ZERO);
        let credited = current.checked_add(amount).ok_or(CustodyError::Overflow)?;

        book.exchange = held;
        book.holders.insert(*to, credited);
        Ok(())
    }

    fn custodied(&self, asset: &AssetHandle) -> Result<Amount, CustodyError> {
        self.state
            .lock()
            .tokens
            .get(asset)
            .map(|book| book.exchange)
            .ok_or_else(|| CustodyError::UnknownAsset {
                asset: asset.clone(),
            })
    }
}
