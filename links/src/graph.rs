//! Graph storage and read-side queries.

use crate::error::LinkError;
use crate::state::{Delegation, EntityLink, PendingDelegations, PendingLinks, RelationPhase};
use passport_checkpoints::CheckpointStore;
use passport_types::{Account, BlockNumber};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Default cap on active entities per passport.
pub const DEFAULT_MAX_ENTITIES_PER_PASSPORT: u32 = 10;

/// Flat, account-keyed store of every link and delegation.
///
/// Each relation lives in exactly one forward map (keyed by the requesting
/// side) plus a reverse index keyed by the other side. There are no pointer
/// chains to walk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkGraph {
    /// entity -> its pending or active link.
    pub(crate) entity_links: HashMap<Account, EntityLink>,
    /// passport -> active entities, in acceptance order.
    pub(crate) passport_entities: HashMap<Account, Vec<Account>>,
    /// passport -> entities with a pending request to it.
    pub(crate) pending_links: HashMap<Account, Vec<Account>>,
    /// delegator -> its pending or active delegation.
    pub(crate) delegations: HashMap<Account, Delegation>,
    /// delegatee -> its active delegator.
    pub(crate) delegators: HashMap<Account, Account>,
    /// delegatee -> delegators with a pending request to it.
    pub(crate) pending_delegations: HashMap<Account, Vec<Account>>,
    pub(crate) max_entities_per_passport: u32,

    /// entity -> passport it was actively linked to, by block.
    pub(crate) entity_passport: CheckpointStore<Account, Option<Account>>,
    /// passport -> number of active entities, by block.
    pub(crate) entity_count: CheckpointStore<Account, u32>,
    /// passport -> every entity that was ever active under it.
    pub(crate) linked_history: HashMap<Account, BTreeSet<Account>>,
    /// delegator -> active delegatee, by block.
    pub(crate) delegatee_history: CheckpointStore<Account, Option<Account>>,
    /// delegatee -> active delegator, by block.
    pub(crate) delegator_history: CheckpointStore<Account, Option<Account>>,
}

impl Default for LinkGraph {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES_PER_PASSPORT)
    }
}

impl LinkGraph {
    pub fn new(max_entities_per_passport: u32) -> Self {
        Self {
            entity_links: HashMap::new(),
            passport_entities: HashMap::new(),
            pending_links: HashMap::new(),
            delegations: HashMap::new(),
            delegators: HashMap::new(),
            pending_delegations: HashMap::new(),
            max_entities_per_passport,
            entity_passport: CheckpointStore::new(),
            entity_count: CheckpointStore::new(),
            linked_history: HashMap::new(),
            delegatee_history: CheckpointStore::new(),
            delegator_history: CheckpointStore::new(),
        }
    }

    pub fn max_entities_per_passport(&self) -> u32 {
        self.max_entities_per_passport
    }

    /// Change the cap. Existing links above a lowered cap are kept; only new
    /// accepts are refused.
    pub fn set_max_entities_per_passport(&mut self, max: u32) {
        self.max_entities_per_passport = max;
    }

    // ── Current state ───────────────────────────────────────────────────

    /// Whether `account` is an active entity of some passport.
    pub fn is_entity(&self, account: &Account) -> bool {
        self.passport_for_entity(account).is_some()
    }

    /// Whether `account` has at least one active entity.
    pub fn is_passport(&self, account: &Account) -> bool {
        !self.entities_of(account).is_empty()
    }

    pub fn passport_for_entity(&self, entity: &Account) -> Option<&Account> {
        self.entity_links
            .get(entity)
            .filter(|link| link.phase == RelationPhase::Active)
            .map(|link| &link.passport)
    }

    /// The account whose ledger and list counters `account` feeds: its
    /// passport if it is an active entity, otherwise itself.
    pub fn resolve_passport(&self, account: &Account) -> Account {
        self.passport_for_entity(account)
            .cloned()
            .unwrap_or_else(|| account.clone())
    }

    pub fn entities_of(&self, passport: &Account) -> &[Account] {
        self.passport_entities
            .get(passport)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn delegatee_of(&self, delegator: &Account) -> Option<&Account> {
        self.delegations
            .get(delegator)
            .filter(|d| d.phase == RelationPhase::Active)
            .map(|d| &d.delegatee)
    }

    pub fn delegator_of(&self, delegatee: &Account) -> Option<&Account> {
        self.delegators.get(delegatee)
    }

    pub fn is_delegator(&self, account: &Account) -> bool {
        self.delegatee_of(account).is_some()
    }

    pub fn is_delegatee(&self, account: &Account) -> bool {
        self.delegators.contains_key(account)
    }

    pub fn pending_links(&self, account: &Account) -> PendingLinks {
        PendingLinks {
            incoming: self.pending_links.get(account).cloned().unwrap_or_default(),
            outgoing: self
                .entity_links
                .get(account)
                .filter(|link| link.phase == RelationPhase::Pending)
                .map(|link| link.passport.clone()),
        }
    }

    pub fn pending_delegations(&self, account: &Account) -> PendingDelegations {
        PendingDelegations {
            incoming: self
                .pending_delegations
                .get(account)
                .cloned()
                .unwrap_or_default(),
            outgoing: self
                .delegations
                .get(account)
                .filter(|d| d.phase == RelationPhase::Pending)
                .map(|d| d.delegatee.clone()),
        }
    }

    // ── History ─────────────────────────────────────────────────────────

    pub fn passport_for_entity_at(&self, entity: &Account, block: BlockNumber) -> Option<Account> {
        self.entity_passport.value_at(entity, block)
    }

    pub fn is_entity_at(&self, entity: &Account, block: BlockNumber) -> bool {
        self.passport_for_entity_at(entity, block).is_some()
    }

    pub fn entity_count_at(&self, passport: &Account, block: BlockNumber) -> u32 {
        self.entity_count.value_at(passport, block)
    }

    pub fn is_passport_at(&self, passport: &Account, block: BlockNumber) -> bool {
        self.entity_count_at(passport, block) > 0
    }

    /// Entities actively linked to `passport` as of `block`, in account order.
    pub fn entities_of_at(&self, passport: &Account, block: BlockNumber) -> Vec<Account> {
        self.linked_history
            .get(passport)
            .into_iter()
            .flatten()
            .filter(|entity| {
                self.passport_for_entity_at(entity, block).as_ref() == Some(passport)
            })
            .cloned()
            .collect()
    }

    pub fn resolve_passport_at(&self, account: &Account, block: BlockNumber) -> Account {
        self.passport_for_entity_at(account, block)
            .unwrap_or_else(|| account.clone())
    }

    pub fn delegatee_at(&self, delegator: &Account, block: BlockNumber) -> Option<Account> {
        self.delegatee_history.value_at(delegator, block)
    }

    pub fn delegator_at(&self, delegatee: &Account, block: BlockNumber) -> Option<Account> {
        self.delegator_history.value_at(delegatee, block)
    }

    pub fn is_delegator_at(&self, account: &Account, block: BlockNumber) -> bool {
        self.delegatee_at(account, block).is_some()
    }

    pub fn is_delegatee_at(&self, account: &Account, block: BlockNumber) -> bool {
        self.delegator_at(account, block).is_some()
    }

    // ── Checkpoint writes ───────────────────────────────────────────────

    pub(crate) fn checkpoint_link(
        &mut self,
        entity: &Account,
        passport: &Account,
        active: bool,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        let count = self.entities_of(passport).len() as u32;
        self.entity_passport
            .push(entity, block, active.then(|| passport.clone()))?;
        self.entity_count.push(passport, block, count)?;
        if active {
            self.linked_history
                .entry(passport.clone())
                .or_default()
                .insert(entity.clone());
        }
        Ok(())
    }

    pub(crate) fn checkpoint_delegation(
        &mut self,
        delegator: &Account,
        delegatee: &Account,
        active: bool,
        block: BlockNumber,
    ) -> Result<(), LinkError> {
        self.delegatee_history
            .push(delegator, block, active.then(|| delegatee.clone()))?;
        self.delegator_history
            .push(delegatee, block, active.then(|| delegator.clone()))?;
        Ok(())
    }
}

/// Remove `item` from the vector stored under `key`, dropping empty vectors.
pub(crate) fn remove_from(map: &mut HashMap<Account, Vec<Account>>, key: &Account, item: &Account) {
    if let Some(list) = map.get_mut(key) {
        list.retain(|a| a != item);
        if list.is_empty() {
            map.remove(key);
        }
    }
}
