//! Entity -> passport linking.

use crate::error::LinkError;
use crate::graph::{remove_from, LinkGraph};
use crate::state::{EntityLink, RelationPhase};
use passport_crypto::{recover_signer, LinkAuthorization, SignedAuthorization, SigningDomain};
use passport_types::{Account, BlockNumber, Timestamp};
use tracing::debug;

impl LinkGraph {
    /// Entity asks to be linked to `passport`. Creates a pending link.
    ///
    /// The passport's capacity is not checked here; any number of requests
    /// may queue up, but only as many as fit can be accepted.
    pub fn request_link(&mut self, entity: &Account, passport: &Account) -> Result<(), LinkError> {
        self.check_link(entity, passport)?;
        self.entity_links.insert(
            entity.clone(),
            EntityLink {
                passport: passport.clone(),
                phase: RelationPhase::Pending,
            },
        );
        self.pending_links
            .entry(passport.clone())
            .or_default()
            .push(entity.clone());
        debug!(%entity, %passport, "link requested");
        Ok(())
    }

    /// Passport accepts a pending request from `entity`.
    pub fn accept_link(
        &mut self,
        passport: &Account,
        entity: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        match self.entity_links.get(entity) {
            None => return Err(LinkError::NotLinked(entity.clone())),
            Some(link) if &link.passport != passport => {
                return Err(LinkError::UnauthorizedUser(passport.clone()))
            }
            Some(link) if link.phase == RelationPhase::Active => {
                return Err(LinkError::AlreadyLinked(entity.clone()))
            }
            Some(_) => {}
        }
        if self.holds_entity_role(passport) {
            return Err(LinkError::AlreadyLinked(passport.clone()));
        }
        self.check_capacity(passport)?;

        remove_from(&mut self.pending_links, passport, entity);
        self.activate_link(entity, passport, block)?;
        debug!(%entity, %passport, %block, "link accepted");
        Ok(())
    }

    /// Passport refuses a pending request from `entity`.
    pub fn deny_link(&mut self, passport: &Account, entity: &Account) -> Result<(), LinkError> {
        self.pending_link_to(entity, passport)?;
        self.entity_links.remove(entity);
        remove_from(&mut self.pending_links, passport, entity);
        debug!(%entity, %passport, "link denied");
        Ok(())
    }

    /// Entity withdraws its own pending request. Returns the passport it was
    /// addressed to.
    pub fn cancel_link(&mut self, entity: &Account) -> Result<Account, LinkError> {
        let passport = match self.entity_links.get(entity) {
            Some(link) if link.phase == RelationPhase::Pending => link.passport.clone(),
            _ => return Err(LinkError::NotLinked(entity.clone())),
        };
        self.entity_links.remove(entity);
        remove_from(&mut self.pending_links, &passport, entity);
        debug!(%entity, %passport, "link request cancelled");
        Ok(passport)
    }

    /// Remove an active link. Either the entity or its passport may call.
    /// Returns the passport the entity was linked to.
    pub fn remove_link(
        &mut self,
        caller: &Account,
        entity: &Account,
        block: BlockNumber,
    ) -> Result<Account, LinkError> {
        let passport = self
            .passport_for_entity(entity)
            .cloned()
            .ok_or_else(|| LinkError::NotLinked(entity.clone()))?;
        if caller != entity && caller != &passport {
            return Err(LinkError::UnauthorizedUser(caller.clone()));
        }

        self.entity_links.remove(entity);
        remove_from(&mut self.passport_entities, &passport, entity);
        self.checkpoint_link(entity, &passport, false, block)?;
        debug!(%entity, %passport, %block, "link removed");
        Ok(passport)
    }

    /// Create an active link straight from the entity's signed consent. The
    /// passport submits it.
    ///
    /// The deadline is checked once, here, against `now`.
    pub fn link_with_signature(
        &mut self,
        passport: &Account,
        authorization: &LinkAuthorization,
        signed: &SignedAuthorization,
        domain: &SigningDomain,
        now: Timestamp,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        if &authorization.passport != passport {
            return Err(LinkError::UnauthorizedUser(passport.clone()));
        }
        if authorization.deadline.is_past(now) {
            return Err(LinkError::SignatureExpired {
                deadline: authorization.deadline,
                now,
            });
        }
        let entity = &authorization.entity;
        if recover_signer(domain, authorization, signed).as_ref() != Some(entity) {
            return Err(LinkError::InvalidSignature);
        }
        self.check_link(entity, passport)?;
        self.check_capacity(passport)?;

        self.activate_link(entity, passport, block)?;
        debug!(%entity, %passport, %block, "link created from signature");
        Ok(())
    }

    fn pending_link_to(&self, entity: &Account, passport: &Account) -> Result<(), LinkError> {
        match self.entity_links.get(entity) {
            Some(link) if link.phase == RelationPhase::Pending && &link.passport == passport => {
                Ok(())
            }
            Some(link) if link.phase == RelationPhase::Pending => {
                Err(LinkError::UnauthorizedUser(passport.clone()))
            }
            _ => Err(LinkError::NotLinked(entity.clone())),
        }
    }

    fn activate_link(
        &mut self,
        entity: &Account,
        passport: &Account,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        self.entity_links.insert(
            entity.clone(),
            EntityLink {
                passport: passport.clone(),
                phase: RelationPhase::Active,
            },
        );
        self.passport_entities
            .entry(passport.clone())
            .or_default()
            .push(entity.clone());
        self.checkpoint_link(entity, passport, true, block)
    }
}
