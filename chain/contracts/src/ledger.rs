//! Balance ledger: custodial accounting per (account, ticker)
//!
//! The ledger is the only mutator of balances and the only caller of the
//! custody backend. Every operation is all-or-nothing:
//! - deposit: resolve ticker → pull from trader → credit
//! - withdraw: resolve ticker → check balance → debit → push to trader,
//!   restoring the debit if the push fails
//!
//! Each balance entry has its own mutex, held across the custody call, so
//! requests touching the same (account, ticker) are serialized while
//! different entries proceed in parallel. Tokens are never deregistered, so
//! a resolved asset handle stays valid for the whole operation.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dex_types::ids::{AccountId, AssetHandle};
use dex_types::numeric::Amount;
use dex_types::ticker::Ticker;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::custody::AssetCustody;
use crate::errors::LedgerError;
use crate::events::{AdminTransferred, Deposited, LedgerEvent, TokenRegistered, Withdrawn};
use crate::registry::{TokenInfo, TokenRegistry};
use crate::security::AccessControl;

type BalanceCell = Arc<Mutex<Amount>>;

/// Composite key of a balance entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalanceKey {
    pub account: AccountId,
    pub ticker: Ticker,
}

impl BalanceKey {
    pub fn new(account: AccountId, ticker: Ticker) -> Self {
        Self { account, ticker }
    }
}

/// Outcome of a successful deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: Uuid,
    pub account_id: AccountId,
    pub ticker: Ticker,
    pub amount: Amount,
    pub balance_after: Amount,
}

/// Custodial balance ledger backed by an [`AssetCustody`] implementation.
pub struct Ledger<C> {
    registry: RwLock<TokenRegistry>,
    access_control: RwLock<AccessControl>,
    balances: DashMap<BalanceKey, BalanceCell>,
    custody: C,
    config: LedgerConfig,
    events: Mutex<VecDeque<LedgerEvent>>,
}

impl<C: AssetCustody> Ledger<C> {
    pub fn new(admin: AccountId, custody: C) -> Self {
        Self::with_config(admin, custody, LedgerConfig::default())
    }

    pub fn with_config(admin: AccountId, custody: C, config: LedgerConfig) -> Self {
        info!(
            %admin,
            reject_zero_amounts = config.reject_zero_amounts,
            check_conservation_on_write = config.check_conservation_on_write,
            "Ledger initialized"
        );
        Self {
            registry: RwLock::new(TokenRegistry::new()),
            access_control: RwLock::new(AccessControl::new(admin)),
            balances: DashMap::new(),
            custody,
            config,
            events: Mutex::new(VecDeque::new()),
        }
    }

    // ───────────────────────── Token Registry ─────────────────────────

    /// Admit a new token. Admin-only; a ticker can be registered once.
    pub fn register_token(
        &self,
        caller: &AccountId,
        ticker: Ticker,
        asset: AssetHandle,
    ) -> Result<TokenInfo, LedgerError> {
        if !self.access_control.read().is_admin(caller) {
            warn!(%caller, %ticker, "Unauthorized token registration");
            return Err(LedgerError::Unauthorized);
        }

        let info = {
            let mut registry = self.registry.write();
            match registry.register(ticker, asset, Utc::now()) {
                Ok(info) => info.clone(),
                Err(err) => {
                    warn!(error = %err, "Token registration rejected");
                    return Err(err.into());
                }
            }
        };

        info!(ticker = %info.ticker, asset = %info.asset, "Token registered");
        self.emit(LedgerEvent::TokenRegistered(TokenRegistered {
            ticker: info.ticker.clone(),
            asset: info.asset.clone(),
            registered_by: *caller,
            timestamp_ms: info.registered_at.timestamp_millis(),
        }));
        Ok(info)
    }

    pub fn is_registered(&self, ticker: &Ticker) -> bool {
        self.registry.read().contains(ticker)
    }

    /// Registered tokens in registration order.
    pub fn tokens(&self) -> Vec<TokenInfo> {
        self.registry.read().tokens().to_vec()
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Pull `amount` of `ticker` from the account's external holdings into
    /// custody and credit the account.
    pub fn deposit(
        &self,
        account: AccountId,
        ticker: &Ticker,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        let asset = self.resolve_asset(ticker)?;
        if amount.is_zero() {
            return self.zero_amount(account, ticker);
        }

        let key = BalanceKey::new(account, ticker.clone());
        let receipt = loop {
            let cell = self.entry_cell(&key);
            let mut balance = cell.lock();
            // A failed deposit may have discarded this cell while we waited.
            if !self.is_live(&key, &cell) {
                continue;
            }

            let Some(credited) = balance.checked_add(amount) else {
                warn!(%account, %ticker, %amount, "Deposit would overflow balance");
                return Err(LedgerError::Overflow);
            };

            if let Err(err) = self.custody.pull_into(&asset, &account, amount) {
                if balance.is_zero() {
                    self.discard_cell(&key, &cell);
                }
                warn!(%account, %ticker, %amount, error = %err, "Custody pull failed");
                return Err(err.into());
            }
            *balance = credited;

            let receipt = Receipt {
                receipt_id: Uuid::now_v7(),
                account_id: account,
                ticker: ticker.clone(),
                amount,
                balance_after: credited,
            };
            self.emit(LedgerEvent::Deposited(Deposited {
                receipt_id: receipt.receipt_id,
                account_id: account,
                ticker: ticker.clone(),
                amount,
                balance_after: credited,
                timestamp_ms: Utc::now().timestamp_millis(),
            }));
            break receipt;
        };

        info!(%account, %ticker, %amount, balance = %receipt.balance_after, "Deposit applied");
        self.audit_conservation(ticker);
        Ok(receipt)
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Debit `amount` of `ticker` from the account and push it back to the
    /// account's external holdings.
    ///
    /// Token existence is checked before balance sufficiency.
    pub fn withdraw(
        &self,
        account: AccountId,
        ticker: &Ticker,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        let asset = self.resolve_asset(ticker)?;
        if amount.is_zero() {
            return self.zero_amount(account, ticker);
        }

        let key = BalanceKey::new(account, ticker.clone());
        let Some(cell) = self.cell(&key) else {
            warn!(%account, %ticker, %amount, available = 0, "Balance too low");
            return Err(LedgerError::InsufficientBalance {
                ticker: ticker.clone(),
                required: amount,
                available: Amount::ZERO,
            });
        };
        let mut balance = cell.lock();

        let previous = *balance;
        let Some(remaining) = previous.checked_sub(amount) else {
            warn!(%account, %ticker, %amount, available = %previous, "Balance too low");
            return Err(LedgerError::InsufficientBalance {
                ticker: ticker.clone(),
                required: amount,
                available: previous,
            });
        };

        *balance = remaining;
        if let Err(err) = self.custody.push_from(&asset, &account, amount) {
            *balance = previous;
            error!(
                %account, %ticker, %amount, error = %err,
                "Custody push failed, debit rolled back"
            );
            return Err(err.into());
        }

        let receipt = Receipt {
            receipt_id: Uuid::now_v7(),
            account_id: account,
            ticker: ticker.clone(),
            amount,
            balance_after: remaining,
        };
        self.emit(LedgerEvent::Withdrawn(Withdrawn {
            receipt_id: receipt.receipt_id,
            account_id: account,
            ticker: ticker.clone(),
            amount,
            balance_after: remaining,
            timestamp_ms: Utc::now().timestamp_millis(),
        }));
        drop(balance);

        info!(%account, %ticker, %amount, balance = %remaining, "Withdrawal applied");
        self.audit_conservation(ticker);
        Ok(receipt)
    }

    // ───────────────────────── Balance Queries ─────────────────────────

    /// Balance of `account` in `ticker`; zero if the account never held it.
    pub fn balance(&self, account: &AccountId, ticker: &Ticker) -> Result<Amount, LedgerError> {
        self.registry.read().resolve(ticker)?;
        let key = BalanceKey::new(*account, ticker.clone());
        Ok(self
            .cell(&key)
            .map(|cell| *cell.lock())
            .unwrap_or(Amount::ZERO))
    }

    /// All non-zero balances of an account.
    pub fn account_balances(&self, account: &AccountId) -> BTreeMap<Ticker, Amount> {
        let cells: Vec<(Ticker, BalanceCell)> = self
            .balances
            .iter()
            .filter(|entry| entry.key().account == *account)
            .map(|entry| (entry.key().ticker.clone(), Arc::clone(entry.value())))
            .collect();

        cells
            .into_iter()
            .map(|(ticker, cell)| (ticker, *cell.lock()))
            .filter(|(_, amount)| !amount.is_zero())
            .collect()
    }

    /// Sum of all account balances for `ticker`.
    pub fn total_balance(&self, ticker: &Ticker) -> Result<Amount, LedgerError> {
        self.registry.read().resolve(ticker)?;
        let cells = self.ticker_cells(ticker);
        let guards: Vec<_> = cells.iter().map(|cell| cell.lock()).collect();
        sum_amounts(guards.iter().map(|guard| **guard))
    }

    /// Verify the ledger never promises more of `ticker` than custody holds.
    ///
    /// Every entry for the ticker is locked while custody is read, so no
    /// deposit or withdrawal on an existing entry can interleave.
    pub fn check_conservation(&self, ticker: &Ticker) -> Result<(), LedgerError> {
        let asset = self.registry.read().resolve(ticker)?.asset.clone();
        let cells = self.ticker_cells(ticker);
        let guards: Vec<_> = cells.iter().map(|cell| cell.lock()).collect();

        let ledger = sum_amounts(guards.iter().map(|guard| **guard))?;
        let custody = self.custody.custodied(&asset)?;
        if ledger > custody {
            return Err(LedgerError::ConservationViolated {
                ticker: ticker.clone(),
                ledger,
                custody,
            });
        }
        Ok(())
    }

    // ───────────────────────── Access Control ─────────────────────────

    pub fn set_admin(&self, current_admin: &AccountId, new_admin: AccountId) -> Result<(), LedgerError> {
        if !self
            .access_control
            .write()
            .transfer_admin(current_admin, new_admin)
        {
            warn!(caller = %current_admin, "Unauthorized admin transfer");
            return Err(LedgerError::Unauthorized);
        }
        info!(previous = %current_admin, current = %new_admin, "Admin transferred");
        self.emit(LedgerEvent::AdminTransferred(AdminTransferred {
            previous: *current_admin,
            current: new_admin,
            timestamp_ms: Utc::now().timestamp_millis(),
        }));
        Ok(())
    }

    pub fn admin(&self) -> AccountId {
        self.access_control.read().admin()
    }

    // ───────────────────────── Accessors ─────────────────────────

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ───────────────────────── Events ─────────────────────────

    /// Snapshot of retained events, oldest first.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.events.lock().drain(..).collect()
    }

    // ───────────────────────── Internal ─────────────────────────

    fn resolve_asset(&self, ticker: &Ticker) -> Result<AssetHandle, LedgerError> {
        match self.registry.read().resolve(ticker) {
            Ok(info) => Ok(info.asset.clone()),
            Err(err) => {
                warn!(%ticker, "This token does not exist");
                Err(err.into())
            }
        }
    }

    fn zero_amount(&self, account: AccountId, ticker: &Ticker) -> Result<Receipt, LedgerError> {
        if self.config.reject_zero_amounts {
            warn!(%account, %ticker, "Zero amount rejected");
            return Err(LedgerError::InvalidAmount);
        }
        let balance_after = self.balance(&account, ticker)?;
        Ok(Receipt {
            receipt_id: Uuid::now_v7(),
            account_id: account,
            ticker: ticker.clone(),
            amount: Amount::ZERO,
            balance_after,
        })
    }

    fn cell(&self, key: &BalanceKey) -> Option<BalanceCell> {
        self.balances.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn entry_cell(&self, key: &BalanceKey) -> BalanceCell {
        match self.balances.entry(key.clone()) {
            Entry::Occupied(occupied) => Arc::clone(occupied.get()),
            Entry::Vacant(vacant) => {
                debug!(account = %key.account, ticker = %key.ticker, "Creating balance entry");
                Arc::clone(vacant.insert(BalanceCell::default()).value())
            }
        }
    }

    fn is_live(&self, key: &BalanceKey, cell: &BalanceCell) -> bool {
        self.balances
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), cell))
    }

    /// Drop an empty entry. Caller holds the cell's lock, which keeps a
    /// concurrent depositor from crediting it in between.
    fn discard_cell(&self, key: &BalanceKey, cell: &BalanceCell) {
        if self
            .balances
            .remove_if(key, |_, current| Arc::ptr_eq(current, cell))
            .is_some()
        {
            debug!(account = %key.account, ticker = %key.ticker, "Discarded empty balance entry");
        }
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.balances.len()
    }

    /// Cells for one ticker, sorted by key so that multi-entry locking
    /// always happens in the same order.
    fn ticker_cells(&self, ticker: &Ticker) -> Vec<BalanceCell> {
        let mut cells: Vec<(BalanceKey, BalanceCell)> = self
            .balances
            .iter()
            .filter(|entry| entry.key().ticker == *ticker)
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells.into_iter().map(|(_, cell)| cell).collect()
    }

    fn audit_conservation(&self, ticker: &Ticker) {
        if !self.config.check_conservation_on_write {
            return;
        }
        if let Err(err) = self.check_conservation(ticker) {
            error!(%ticker, error = %err, "Conservation check failed");
        }
    }

    fn emit(&self, event: LedgerEvent) {
        let mut events = self.events.lock();
        events.push_back(event);
        while events.len() > self.config.max_event_log {
            events.pop_front();
        }
    }
}

fn sum_amounts(mut amounts: impl Iterator<Item = Amount>) -> Result<Amount, LedgerError> {
    amounts.try_fold(Amount::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or(LedgerError::Overflow)
    })
}
