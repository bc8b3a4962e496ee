//! Ledger events
//!
//! Immutable records emitted by successful registry and ledger operations.
//! Rejected operations emit nothing.

use dex_types::ids::{AccountId, AssetHandle};
use dex_types::numeric::Amount;
use dex_types::ticker::Ticker;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A token was admitted to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistered {
    pub ticker: Ticker,
    pub asset: AssetHandle,
    pub registered_by: AccountId,
    pub timestamp_ms: i64,
}

/// Tokens moved into custody and credited to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub receipt_id: Uuid,
    pub account_id: AccountId,
    pub ticker: Ticker,
    pub amount: Amount,
    pub balance_after: Amount,
    pub timestamp_ms: i64,
}

/// Tokens debited from an account and returned from custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub receipt_id: Uuid,
    pub account_id: AccountId,
    pub ticker: Ticker,
    pub amount: Amount,
    pub balance_after: Amount,
    pub timestamp_ms: i64,
}

/// The admin role changed hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTransferred {
    pub previous: AccountId,
    pub current: AccountId,
    pub timestamp_ms: i64,
}

/// Enum wrapper for all ledger events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    TokenRegistered(TokenRegistered),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    AdminTransferred(AdminTransferred),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposited_serialization() {
        let event = Deposited {
            receipt_id: Uuid::now_v7(),
            account_id: AccountId::new(),
            ticker: Ticker::new("DAI").unwrap(),
            amount: Amount::new(100),
            balance_after: Amount::new(100),
            timestamp_ms: 1708123456789,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"ticker\":\"DAI\""));
        let deser: Deposited = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_ledger_event_variant() {
        let event = LedgerEvent::TokenRegistered(TokenRegistered {
            ticker: Ticker::new("ZRX").unwrap(),
            asset: AssetHandle::try_new("0xzrx").unwrap(),
            registered_by: AccountId::new(),
            timestamp_ms: 0,
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(deser, LedgerEvent::TokenRegistered(_)));
    }
}
