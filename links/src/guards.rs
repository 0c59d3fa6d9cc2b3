//! Mutual-exclusion guards shared by both state machines.
//!
//! Role predicates here count pending relations as well as active ones: a
//! request in flight already reserves the role it would grant.

use crate::error::LinkError;
use crate::graph::LinkGraph;
use crate::state::RelationPhase;
use passport_types::Account;

impl LinkGraph {
    /// Entity side of a pending or active link.
    pub(crate) fn holds_entity_role(&self, account: &Account) -> bool {
        self.entity_links.contains_key(account)
    }

    /// Passport side of a pending or active link.
    pub(crate) fn holds_passport_role(&self, account: &Account) -> bool {
        self.passport_entities.contains_key(account) || self.pending_links.contains_key(account)
    }

    /// Delegator or delegatee side of a pending or active delegation.
    pub(crate) fn holds_delegation_role(&self, account: &Account) -> bool {
        self.delegations.contains_key(account)
            || self.delegators.contains_key(account)
            || self.pending_delegations.contains_key(account)
    }

    pub(crate) fn check_link(&self, entity: &Account, passport: &Account) -> Result<(), LinkError> {
        if entity == passport {
            return Err(LinkError::CannotLinkToSelf);
        }
        if self.holds_delegation_role(entity) {
            return Err(LinkError::DelegatedEntity(entity.clone()));
        }
        if self.holds_entity_role(entity) || self.holds_passport_role(entity) {
            return Err(LinkError::AlreadyLinked(entity.clone()));
        }
        if self.holds_entity_role(passport) {
            return Err(LinkError::AlreadyLinked(passport.clone()));
        }
        Ok(())
    }

    pub(crate) fn check_capacity(&self, passport: &Account) -> Result<(), LinkError> {
        if self.entities_of(passport).len() as u32 >= self.max_entities_per_passport {
            return Err(LinkError::MaxEntitiesPerPassportReached {
                passport: passport.clone(),
                max: self.max_entities_per_passport,
            });
        }
        Ok(())
    }

    /// Guards for a delegation request. An existing outgoing delegation of
    /// `delegator` is not a conflict; it gets replaced.
    pub(crate) fn check_delegation(
        &self,
        delegator: &Account,
        delegatee: &Account,
    ) -> Result<(), LinkError> {
        if delegator == delegatee {
            return Err(LinkError::CannotDelegateToSelf);
        }
        if self.holds_entity_role(delegator) {
            return Err(LinkError::PassportDelegationFromEntity(delegator.clone()));
        }
        if self.holds_entity_role(delegatee) {
            return Err(LinkError::PassportDelegationToEntity(delegatee.clone()));
        }
        self.check_delegation_chain(delegator, delegatee)
    }

    /// Refuse chains (`a -> b -> c`) and a second active delegator.
    pub(crate) fn check_delegation_chain(
        &self,
        delegator: &Account,
        delegatee: &Account,
    ) -> Result<(), LinkError> {
        if self.delegators.contains_key(delegator) {
            return Err(LinkError::AlreadyLinked(delegator.clone()));
        }
        let delegatee_delegates = self
            .delegations
            .get(delegatee)
            .is_some_and(|d| d.phase == RelationPhase::Active);
        if delegatee_delegates {
            return Err(LinkError::AlreadyLinked(delegatee.clone()));
        }
        if self
            .delegators
            .get(delegatee)
            .is_some_and(|current| current != delegator)
        {
            return Err(LinkError::AlreadyLinked(delegatee.clone()));
        }
        Ok(())
    }
}
