//! Access control for administrative operations
//!
//! The exchange has exactly one administrator. Only the administrator may
//! register tokens or hand the role to another account.

use dex_types::ids::AccountId;

/// Single-administrator access control.
#[derive(Debug, Clone)]
pub struct AccessControl {
    admin: AccountId,
}

impl AccessControl {
    pub fn new(admin: AccountId) -> Self {
        Self { admin }
    }

    pub fn is_admin(&self, caller: &AccountId) -> bool {
        self.admin == *caller
    }

    /// Transfer the admin role. Returns `false` if `current_admin` is not admin.
    pub fn transfer_admin(&mut self, current_admin: &AccountId, new_admin: AccountId) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.admin = new_admin;
        true
    }

    pub fn admin(&self) -> AccountId {
        self.admin
    }
}
