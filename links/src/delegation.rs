//! Passport -> passport delegation of personhood.

use crate::error::LinkError;
use crate::graph::{remove_from, LinkGraph};
use crate::state::{Delegation, RelationPhase};
use passport_crypto::{recover_signer, DelegationAuthorization, SignedAuthorization, SigningDomain};
use passport_types::{Account, BlockNumber, Timestamp};
use tracing::debug;

impl LinkGraph {
    /// Delegator asks `delegatee` to take over its personhood.
    ///
    /// A delegator has at most one outgoing delegation. An existing pending
    /// request is replaced; an existing active delegation is revoked at
    /// `block` first.
    pub fn request_delegation(
        &mut self,
        delegator: &Account,
        delegatee: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        self.check_delegation(delegator, delegatee)?;
        self.clear_outgoing_delegation(delegator, block)?;

        self.delegations.insert(
            delegator.clone(),
            Delegation {
                delegatee: delegatee.clone(),
                phase: RelationPhase::Pending,
            },
        );
        self.pending_delegations
            .entry(delegatee.clone())
            .or_default()
            .push(delegator.clone());
        debug!(%delegator, %delegatee, "delegation requested");
        Ok(())
    }

    /// Delegatee accepts a pending request from `delegator`.
    pub fn accept_delegation(
        &mut self,
        delegatee: &Account,
        delegator: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        match self.delegations.get(delegator) {
            None => return Err(LinkError::NotDelegated(delegator.clone())),
            Some(d) if &d.delegatee != delegatee => {
                return Err(LinkError::UnauthorizedUser(delegatee.clone()))
            }
            Some(d) if d.phase == RelationPhase::Active => {
                return Err(LinkError::AlreadyLinked(delegator.clone()))
            }
            Some(_) => {}
        }
        self.check_delegation_chain(delegator, delegatee)?;

        remove_from(&mut self.pending_delegations, delegatee, delegator);
        self.activate_delegation(delegator, delegatee, block)?;
        debug!(%delegator, %delegatee, %block, "delegation accepted");
        Ok(())
    }

    /// Delegatee refuses a pending request from `delegator`.
    pub fn deny_delegation(
        &mut self,
        delegatee: &Account,
        delegator: &Account,
    ) -> Result<(), LinkError> {
        match self.delegations.get(delegator) {
            Some(d) if d.phase == RelationPhase::Pending && &d.delegatee == delegatee => {}
            Some(d) if d.phase == RelationPhase::Pending => {
                return Err(LinkError::UnauthorizedUser(delegatee.clone()))
            }
            _ => return Err(LinkError::NotDelegated(delegator.clone())),
        }
        self.delegations.remove(delegator);
        remove_from(&mut self.pending_delegations, delegatee, delegator);
        debug!(%delegator, %delegatee, "delegation denied");
        Ok(())
    }

    /// Delegator withdraws its pending request. Returns the delegatee it was
    /// addressed to.
    pub fn cancel_delegation(&mut self, delegator: &Account) -> Result<Account, LinkError> {
        let delegatee = match self.delegations.get(delegator) {
            Some(d) if d.phase == RelationPhase::Pending => d.delegatee.clone(),
            _ => return Err(LinkError::NotDelegated(delegator.clone())),
        };
        self.delegations.remove(delegator);
        remove_from(&mut self.pending_delegations, &delegatee, delegator);
        debug!(%delegator, %delegatee, "delegation request cancelled");
        Ok(delegatee)
    }

    /// End the active delegation `caller` is a party to, from either side.
    /// Returns `(delegator, delegatee)`.
    pub fn revoke_delegation(
        &mut self,
        caller: &Account,
        block: BlockNumber,
    ) -> Result<(Account, Account), LinkError> {
        let (delegator, delegatee) = if let Some(delegatee) = self.delegatee_of(caller) {
            (caller.clone(), delegatee.clone())
        } else if let Some(delegator) = self.delegator_of(caller) {
            (delegator.clone(), caller.clone())
        } else {
            return Err(LinkError::NotDelegated(caller.clone()));
        };

        self.deactivate_delegation(&delegator, &delegatee, block)?;
        debug!(%delegator, %delegatee, %block, "delegation revoked");
        Ok((delegator, delegatee))
    }

    /// Create an active delegation from the delegator's signed consent. The
    /// delegatee submits it.
    pub fn delegate_with_signature(
        &mut self,
        delegatee: &Account,
        authorization: &DelegationAuthorization,
        signed: &SignedAuthorization,
        domain: &SigningDomain,
        now: Timestamp,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        if &authorization.delegatee != delegatee {
            return Err(LinkError::UnauthorizedUser(delegatee.clone()));
        }
        if authorization.deadline.is_past(now) {
            return Err(LinkError::SignatureExpired {
                deadline: authorization.deadline,
                now,
            });
        }
        let delegator = &authorization.delegator;
        if recover_signer(domain, authorization, signed).as_ref() != Some(delegator) {
            return Err(LinkError::InvalidSignature);
        }
        self.check_delegation(delegator, delegatee)?;
        self.clear_outgoing_delegation(delegator, block)?;

        self.activate_delegation(delegator, delegatee, block)?;
        debug!(%delegator, %delegatee, %block, "delegation created from signature");
        Ok(())
    }

    fn clear_outgoing_delegation(
        &mut self,
        delegator: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        let Some(existing) = self.delegations.get(delegator).cloned() else {
            return Ok(());
        };
        match existing.phase {
            RelationPhase::Pending => {
                self.delegations.remove(delegator);
                remove_from(&mut self.pending_delegations, &existing.delegatee, delegator);
                Ok(())
            }
            RelationPhase::Active => {
                self.deactivate_delegation(delegator, &existing.delegatee, block)
            }
        }
    }

    fn activate_delegation(
        &mut self,
        delegator: &Account,
        delegatee: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        self.delegations.insert(
            delegator.clone(),
            Delegation {
                delegatee: delegatee.clone(),
                phase: RelationPhase::Active,
            },
        );
        self.delegators.insert(delegatee.clone(), delegator.clone());
        self.checkpoint_delegation(delegator, delegatee, true, block)
    }

    fn deactivate_delegation(
        &mut self,
        delegator: &Account,
        delegatee: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        self.delegations.remove(delegator);
        self.delegators.remove(delegatee);
        self.checkpoint_delegation(delegator, delegatee, false, block)
    }
}
