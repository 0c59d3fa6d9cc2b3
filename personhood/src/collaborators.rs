//! Services the passport consumes but does not implement.
//!
//! Production wires these to the chain; tests use `passport-nullables`.

use passport_types::{Account, AppId, BlockNumber, Round, SecurityLevel, Timestamp, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Capabilities checked at the top of each administrative handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    ActionRegistrar,
    ScoreManager,
    SettingsManager,
    Whitelister,
    Signaler,
    RoleGranter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActionRegistrar => "action-registrar",
            Self::ScoreManager => "score-manager",
            Self::SettingsManager => "settings-manager",
            Self::Whitelister => "whitelister",
            Self::Signaler => "signaler",
            Self::RoleGranter => "role-granter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait AccessControl {
    fn has_role(&self, account: &Account, role: Role) -> bool;
}

/// Galaxy-member NFT tiers.
pub trait MembershipTiers {
    fn level_of(&self, token: TokenId) -> u64;
    /// Token the owner selected to represent them, if any.
    fn selected_token(&self, owner: &Account) -> Option<TokenId>;
    fn level_of_at(&self, token: TokenId, block: BlockNumber) -> u64;
    fn selected_token_at(&self, owner: &Account, block: BlockNumber) -> Option<TokenId>;
}

pub trait AppRegistry {
    fn security_level_of(&self, app: &AppId) -> SecurityLevel;
}

pub trait VotingRounds {
    fn current_round(&self) -> Round;
    /// Round in progress at `block`.
    fn round_at(&self, block: BlockNumber) -> Round;
}

pub trait ChainClock {
    fn block_number(&self) -> BlockNumber;
    fn now(&self) -> Timestamp;
}

/// The full set of collaborators a [`crate::PassportService`] runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub access: Arc<dyn AccessControl + Send + Sync>,
    pub tiers: Arc<dyn MembershipTiers + Send + Sync>,
    pub apps: Arc<dyn AppRegistry + Send + Sync>,
    pub rounds: Arc<dyn VotingRounds + Send + Sync>,
    pub clock: Arc<dyn ChainClock + Send + Sync>,
}
