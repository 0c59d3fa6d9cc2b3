//! Nullable galaxy-member tiers with history.

use parking_lot::RwLock;
use passport_checkpoints::CheckpointStore;
use passport_personhood::MembershipTiers;
use passport_types::{Account, BlockNumber, TokenId};

#[derive(Debug, Default)]
pub struct NullMembership {
    selected: RwLock<CheckpointStore<Account, Option<TokenId>>>,
    levels: RwLock<CheckpointStore<TokenId, u64>>,
}

impl NullMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// `owner` selects `token` (or clears its selection) as of `block`.
    pub fn select_token(&self, owner: &Account, token: Option<TokenId>, block: BlockNumber) {
        self.selected
            .write()
            .push(owner, block, token)
            .expect("selections must be recorded in block order");
    }

    /// `token` is at `level` as of `block`.
    pub fn set_level(&self, token: TokenId, level: u64, block: BlockNumber) {
        self.levels
            .write()
            .push(&token, block, level)
            .expect("levels must be recorded in block order");
    }
}

impl MembershipTiers for NullMembership {
    fn level_of(&self, token: TokenId) -> u64 {
        self.levels.read().current(&token)
    }

    fn selected_token(&self, owner: &Account) -> Option<TokenId> {
        self.selected.read().current(owner)
    }

    fn level_of_at(&self, token: TokenId, block: BlockNumber) -> u64 {
        self.levels.read().value_at(&token, block)
    }

    fn selected_token_at(&self, owner: &Account, block: BlockNumber) -> Option<TokenId> {
        self.selected.read().value_at(owner, block)
    }
}
