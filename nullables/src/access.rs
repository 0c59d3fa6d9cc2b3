//! Nullable access control: an in-memory role table.

use parking_lot::RwLock;
use passport_personhood::{AccessControl, Role};
use passport_types::Account;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct NullAccessControl {
    grants: RwLock<HashSet<(Account, Role)>>,
}

impl NullAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, account: &Account, role: Role) {
        self.grants.write().insert((account.clone(), role));
    }

    pub fn revoke(&self, account: &Account, role: Role) {
        self.grants.write().remove(&(account.clone(), role));
    }

    /// Grant every role to `account`.
    pub fn grant_all(&self, account: &Account) {
        for role in [
            Role::ActionRegistrar,
            Role::ScoreManager,
            Role::SettingsManager,
            Role::Whitelister,
            Role::Signaler,
            Role::RoleGranter,
        ] {
            self.grant(account, role);
        }
    }
}

impl AccessControl for NullAccessControl {
    fn has_role(&self, account: &Account, role: Role) -> bool {
        self.grants.read().contains(&(account.clone(), role))
    }
}
