//! List membership, per-passport aggregates and the percentage rule.

use crate::error::ListError;
use passport_links::LinkGraph;
use passport_types::{Account, AppId, BlockNumber};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Default share of entities, in percent, that must be listed for the
/// passport to count as listed.
pub const DEFAULT_LIST_THRESHOLD: u8 = 100;

/// Default number of signals after which an account fails the signaling check.
pub const DEFAULT_SIGNALING_THRESHOLD: u64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListManager {
    pub(crate) whitelisted: HashSet<Account>,
    pub(crate) blacklisted: HashSet<Account>,
    /// passport -> number of its active entities that are whitelisted.
    pub(crate) whitelisted_entities: HashMap<Account, u32>,
    /// passport -> number of its active entities that are blacklisted.
    pub(crate) blacklisted_entities: HashMap<Account, u32>,
    pub(crate) whitelist_threshold: u8,
    pub(crate) blacklist_threshold: u8,

    pub(crate) signaled: HashMap<Account, u64>,
    pub(crate) app_signalers: HashMap<Account, AppId>,
    pub(crate) app_signals: HashMap<AppId, u64>,
    pub(crate) signaling_threshold: u64,
}

impl Default for ListManager {
    fn default() -> Self {
        Self::new(
            DEFAULT_LIST_THRESHOLD,
            DEFAULT_LIST_THRESHOLD,
            DEFAULT_SIGNALING_THRESHOLD,
        )
    }
}

impl ListManager {
    /// Thresholds are taken as given; use the setters to validate input.
    pub fn new(whitelist_threshold: u8, blacklist_threshold: u8, signaling_threshold: u64) -> Self {
        Self {
            whitelisted: HashSet::new(),
            blacklisted: HashSet::new(),
            whitelisted_entities: HashMap::new(),
            blacklisted_entities: HashMap::new(),
            whitelist_threshold,
            blacklist_threshold,
            signaled: HashMap::new(),
            app_signalers: HashMap::new(),
            app_signals: HashMap::new(),
            signaling_threshold,
        }
    }

    // ── Direct listing ──────────────────────────────────────────────────

    pub fn is_whitelisted(&self, account: &Account) -> bool {
        self.whitelisted.contains(account)
    }

    pub fn is_blacklisted(&self, account: &Account) -> bool {
        self.blacklisted.contains(account)
    }

    pub fn listing(&self, account: &Account) -> Option<ListKind> {
        if self.is_whitelisted(account) {
            Some(ListKind::Whitelist)
        } else if self.is_blacklisted(account) {
            Some(ListKind::Blacklist)
        } else {
            None
        }
    }

    /// Whitelist `account`, clearing a blacklisting. Returns `false` if it
    /// was already whitelisted.
    pub fn whitelist(&mut self, account: &Account, graph: &LinkGraph) -> bool {
        self.list(account, ListKind::Whitelist, graph)
    }

    /// Blacklist `account`, clearing a whitelisting. Returns `false` if it
    /// was already blacklisted.
    pub fn blacklist(&mut self, account: &Account, graph: &LinkGraph) -> bool {
        self.list(account, ListKind::Blacklist, graph)
    }

    /// Returns `false` if `account` was not whitelisted.
    pub fn remove_from_whitelist(&mut self, account: &Account, graph: &LinkGraph) -> bool {
        self.unlist(account, ListKind::Whitelist, graph)
    }

    /// Returns `false` if `account` was not blacklisted.
    pub fn remove_from_blacklist(&mut self, account: &Account, graph: &LinkGraph) -> bool {
        self.unlist(account, ListKind::Blacklist, graph)
    }

    fn list(&mut self, account: &Account, kind: ListKind, graph: &LinkGraph) -> bool {
        let other = match kind {
            ListKind::Whitelist => ListKind::Blacklist,
            ListKind::Blacklist => ListKind::Whitelist,
        };
        if self.set(kind).contains(account) {
            return false;
        }
        self.unlist(account, other, graph);
        self.set_mut(kind).insert(account.clone());
        if let Some(passport) = graph.passport_for_entity(account) {
            *self.aggregate_mut(kind).entry(passport.clone()).or_default() += 1;
        }
        debug!(%account, ?kind, "listed");
        true
    }

    fn unlist(&mut self, account: &Account, kind: ListKind, graph: &LinkGraph) -> bool {
        if !self.set_mut(kind).remove(account) {
            return false;
        }
        if let Some(passport) = graph.passport_for_entity(account) {
            decrement(self.aggregate_mut(kind), passport, 1);
        }
        debug!(%account, ?kind, "unlisted");
        true
    }

    fn set(&self, kind: ListKind) -> &HashSet<Account> {
        match kind {
            ListKind::Whitelist => &self.whitelisted,
            ListKind::Blacklist => &self.blacklisted,
        }
    }

    fn set_mut(&mut self, kind: ListKind) -> &mut HashSet<Account> {
        match kind {
            ListKind::Whitelist => &mut self.whitelisted,
            ListKind::Blacklist => &mut self.blacklisted,
        }
    }

    fn aggregate_mut(&mut self, kind: ListKind) -> &mut HashMap<Account, u32> {
        match kind {
            ListKind::Whitelist => &mut self.whitelisted_entities,
            ListKind::Blacklist => &mut self.blacklisted_entities,
        }
    }

    // ── Thresholds ──────────────────────────────────────────────────────

    pub fn whitelist_threshold(&self) -> u8 {
        self.whitelist_threshold
    }

    pub fn blacklist_threshold(&self) -> u8 {
        self.blacklist_threshold
    }

    pub fn set_whitelist_threshold(&mut self, percentage: u8) -> Result<(), ListError> {
        self.whitelist_threshold = validate_percentage(percentage)?;
        Ok(())
    }

    pub fn set_blacklist_threshold(&mut self, percentage: u8) -> Result<(), ListError> {
        self.blacklist_threshold = validate_percentage(percentage)?;
        Ok(())
    }

    // ── Passport rule ───────────────────────────────────────────────────

    pub fn whitelisted_entity_count(&self, passport: &Account) -> u32 {
        self.whitelisted_entities.get(passport).copied().unwrap_or(0)
    }

    pub fn blacklisted_entity_count(&self, passport: &Account) -> u32 {
        self.blacklisted_entities.get(passport).copied().unwrap_or(0)
    }

    /// Whether the passport `account` resolves to is whitelisted.
    pub fn is_passport_whitelisted(&self, account: &Account, graph: &LinkGraph) -> bool {
        self.passport_listed(account, ListKind::Whitelist, graph)
    }

    /// Whether the passport `account` resolves to is blacklisted.
    pub fn is_passport_blacklisted(&self, account: &Account, graph: &LinkGraph) -> bool {
        self.passport_listed(account, ListKind::Blacklist, graph)
    }

    /// As [`Self::is_passport_whitelisted`], with the entity set as of `block`.
    pub fn is_passport_whitelisted_at(
        &self,
        account: &Account,
        block: BlockNumber,
        graph: &LinkGraph,
    ) -> bool {
        self.passport_listed_at(account, ListKind::Whitelist, block, graph)
    }

    /// As [`Self::is_passport_blacklisted`], with the entity set as of `block`.
    pub fn is_passport_blacklisted_at(
        &self,
        account: &Account,
        block: BlockNumber,
        graph: &LinkGraph,
    ) -> bool {
        self.passport_listed_at(account, ListKind::Blacklist, block, graph)
    }

    fn passport_listed(&self, account: &Account, kind: ListKind, graph: &LinkGraph) -> bool {
        let passport = graph.resolve_passport(account);
        let total = graph.entities_of(&passport).len() as u32;
        if total == 0 {
            return self.set(kind).contains(&passport);
        }
        let listed = match kind {
            ListKind::Whitelist => self.whitelisted_entity_count(&passport),
            ListKind::Blacklist => self.blacklisted_entity_count(&passport),
        };
        meets_threshold(listed, total, self.threshold(kind))
    }

    fn passport_listed_at(
        &self,
        account: &Account,
        kind: ListKind,
        block: BlockNumber,
        graph: &LinkGraph,
    ) -> bool {
        let passport = graph.resolve_passport_at(account, block);
        let entities = graph.entities_of_at(&passport, block);
        if entities.is_empty() {
            return self.set(kind).contains(&passport);
        }
        let set = self.set(kind);
        let listed = entities.iter().filter(|e| set.contains(*e)).count() as u32;
        meets_threshold(listed, entities.len() as u32, self.threshold(kind))
    }

    fn threshold(&self, kind: ListKind) -> u8 {
        match kind {
            ListKind::Whitelist => self.whitelist_threshold,
            ListKind::Blacklist => self.blacklist_threshold,
        }
    }

    // ── Link hooks ──────────────────────────────────────────────────────

    /// Fold a newly active entity's status into its passport's aggregates.
    pub fn on_entity_linked(&mut self, entity: &Account, passport: &Account) {
        if let Some(kind) = self.listing(entity) {
            *self.aggregate_mut(kind).entry(passport.clone()).or_default() += 1;
        }
        let signals = self.signal_count(entity);
        if signals > 0 {
            *self.signaled.entry(passport.clone()).or_default() += signals;
        }
    }

    /// Take a removed entity's status back out of its former passport's
    /// aggregates. The entity keeps its own counters.
    pub fn on_entity_unlinked(&mut self, entity: &Account, passport: &Account) {
        if let Some(kind) = self.listing(entity) {
            decrement(self.aggregate_mut(kind), passport, 1);
        }
        let signals = self.signal_count(entity);
        if signals > 0 {
            decrement(&mut self.signaled, passport, signals);
        }
    }
}

fn validate_percentage(percentage: u8) -> Result<u8, ListError> {
    if percentage > 100 {
        return Err(ListError::InvalidThreshold(percentage));
    }
    Ok(percentage)
}

fn meets_threshold(listed: u32, total: u32, threshold: u8) -> bool {
    u64::from(listed) * 100 / u64::from(total) >= u64::from(threshold)
}

/// Saturating decrement that drops zeroed entries.
pub(crate) fn decrement<V>(map: &mut HashMap<Account, V>, key: &Account, by: V)
where
    V: Copy + PartialOrd + std::ops::Sub<Output = V>,
{
    if let Some(value) = map.get_mut(key) {
        if *value > by {
            *value = *value - by;
        } else {
            map.remove(key);
        }
    }
}
