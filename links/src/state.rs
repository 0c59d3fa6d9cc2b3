//! Relation records.

use passport_types::Account;
use serde::{Deserialize, Serialize};

/// Where a relation is in its handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationPhase {
    Pending,
    Active,
}

/// An entity's single outgoing link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub passport: Account,
    pub phase: RelationPhase,
}

/// A delegator's single outgoing delegation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegatee: Account,
    pub phase: RelationPhase,
}

/// Pending link requests touching one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLinks {
    /// Entities waiting for this account (as passport) to accept.
    pub incoming: Vec<Account>,
    /// Passport this account (as entity) is waiting on.
    pub outgoing: Option<Account>,
}

/// Pending delegation requests touching one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelegations {
    /// Delegators waiting for this account to accept.
    pub incoming: Vec<Account>,
    /// Delegatee this account is waiting on.
    pub outgoing: Option<Account>,
}
