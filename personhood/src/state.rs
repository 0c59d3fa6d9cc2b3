//! The complete passport state and its operations.
//!
//! [`PassportState`] owns the score ledger, the lists, the link graph and
//! the evaluator settings, and keeps them consistent with each other: links
//! feed list aggregates, the graph decides which ledger an action credits,
//! and every committed change is recorded as a [`PassportEvent`].
//!
//! Operations here take the block number and clock time explicitly and do no
//! access control. [`crate::PassportService`] supplies both and runs each
//! operation as one transaction.
//!
//! An operation that returns `Err` has not modified the state: every check
//! runs before the first write. Checkpoint pushes cannot fail once the
//! operation's block is at or after [`PassportState::latest_block`].

use crate::collaborators::AppRegistry;
use crate::config::PassportConfig;
use crate::events::{PassportEvent, SettingChange};
use crate::settings::PersonhoodSettings;
use crate::PersonhoodError;
use passport_crypto::{DelegationAuthorization, LinkAuthorization, SignedAuthorization, SigningDomain};
use passport_links::{LinkGraph, PendingDelegations, PendingLinks};
use passport_lists::{ListKind, ListManager};
use passport_score::{ScoreLedger, ScoreParams};
use passport_types::{
    Account, AppId, BlockNumber, CheckSet, PersonhoodCheck, Round, SecurityLevel, Timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassportState {
    pub(crate) settings: PersonhoodSettings,
    pub(crate) ledger: ScoreLedger,
    pub(crate) lists: ListManager,
    pub(crate) graph: LinkGraph,
    /// Newest block any operation was applied at.
    pub(crate) latest_block: BlockNumber,
    /// Events of the operation in progress. Never persisted.
    #[serde(skip)]
    pub(crate) events: Vec<PassportEvent>,
}

impl PassportState {
    /// Genesis state seeded from `config`, with settings checkpointed at
    /// `genesis`.
    pub fn from_config(config: &PassportConfig, genesis: BlockNumber) -> Result<Self, PersonhoodError> {
        let mut params = ScoreParams::new(
            config.decay_rate,
            config.rounds_for_cumulative_score,
            genesis,
        )?;
        for level in SecurityLevel::ALL {
            params.set_security_multiplier(level, config.security_multipliers.get(level));
        }

        let mut lists = ListManager::default();
        lists.set_whitelist_threshold(config.whitelist_threshold)?;
        lists.set_blacklist_threshold(config.blacklist_threshold)?;
        lists.set_signaling_threshold(config.signaling_threshold);

        let checks: CheckSet = config.enabled_checks.iter().copied().collect();
        Ok(Self {
            settings: PersonhoodSettings::new(
                config.threshold_pop_score,
                config.minimum_galaxy_member_level,
                checks,
                genesis,
            ),
            ledger: ScoreLedger::new(params),
            lists,
            graph: LinkGraph::new(config.max_entities_per_passport),
            latest_block: genesis,
            events: Vec::new(),
        })
    }

    pub fn settings(&self) -> &PersonhoodSettings {
        &self.settings
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn lists(&self) -> &ListManager {
        &self.lists
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    pub fn latest_block(&self) -> BlockNumber {
        self.latest_block
    }

    pub(crate) fn advance_to(&mut self, block: BlockNumber) {
        self.latest_block = self.latest_block.max(block);
    }

    /// Take the events buffered since the last call.
    pub fn take_events(&mut self) -> Vec<PassportEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: PassportEvent) {
        self.events.push(event);
    }

    fn setting_changed(&mut self, change: SettingChange) {
        info!(?change, "setting changed");
        self.emit(PassportEvent::SettingChanged(change));
    }

    // ── Score ───────────────────────────────────────────────────────────

    /// Security level an app is scored at: an explicit assignment wins over
    /// the registry.
    pub fn effective_app_security(&self, app: &AppId, registry: &dyn AppRegistry) -> SecurityLevel {
        self.ledger
            .params()
            .app_security(app)
            .unwrap_or_else(|| registry.security_level_of(app))
    }

    /// Credit one action in `app` during `round`. `registry_level` is what
    /// the application registry reports for `app`.
    pub fn register_action(
        &mut self,
        account: &Account,
        app: AppId,
        round: Round,
        registry_level: SecurityLevel,
    ) -> Result<u64, PersonhoodError> {
        let level = self
            .ledger
            .params()
            .app_security(&app)
            .unwrap_or(registry_level);
        let points = self.ledger.points_for(level);
        self.record_points(account, app, round, points)
    }

    /// Credit `points` at once, e.g. when back-filling actions.
    pub fn register_aggregated_actions_for_round(
        &mut self,
        account: &Account,
        app: AppId,
        round: Round,
        points: u64,
    ) -> Result<u64, PersonhoodError> {
        self.record_points(account, app, round, points)
    }

    /// Points go to the passport of an active entity, as linked right now.
    /// A recipient the evaluator would treat as blacklisted gets a
    /// zero-point record.
    fn record_points(
        &mut self,
        account: &Account,
        app: AppId,
        round: Round,
        points: u64,
    ) -> Result<u64, PersonhoodError> {
        let credited_to = self.graph.resolve_passport(account);
        let points = if self.lists.is_passport_blacklisted(&credited_to, &self.graph) {
            0
        } else {
            points
        };

        self.ledger.record(&credited_to, app, round, points)?;
        debug!(%account, %credited_to, %app, %round, points, "action registered");
        self.emit(PassportEvent::ActionRegistered {
            account: account.clone(),
            credited_to,
            app,
            round,
            points,
        });
        Ok(points)
    }

    pub fn set_threshold_pop_score(
        &mut self,
        threshold: u64,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.settings.set_threshold_pop_score(threshold, block)?;
        self.setting_changed(SettingChange::ThresholdPoPScore(threshold));
        Ok(())
    }

    pub fn set_decay_rate(&mut self, rate: u64, block: BlockNumber) -> Result<(), PersonhoodError> {
        self.ledger.params_mut().set_decay_rate(rate, block)?;
        self.setting_changed(SettingChange::DecayRate(rate));
        Ok(())
    }

    pub fn set_rounds_for_cumulative_score(
        &mut self,
        rounds: u64,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.ledger
            .params_mut()
            .set_rounds_for_cumulative_score(rounds, block)?;
        self.setting_changed(SettingChange::RoundsForCumulativeScore(rounds));
        Ok(())
    }

    pub fn set_security_multiplier(&mut self, level: SecurityLevel, multiplier: u64) {
        self.ledger
            .params_mut()
            .set_security_multiplier(level, multiplier);
        self.setting_changed(SettingChange::SecurityMultiplier { level, multiplier });
    }

    pub fn set_app_security(&mut self, app: AppId, level: SecurityLevel) {
        self.ledger.params_mut().set_app_security(app, level);
        self.setting_changed(SettingChange::AppSecurity { app, level });
    }

    // ── Evaluator settings ──────────────────────────────────────────────

    pub fn set_minimum_galaxy_member_level(
        &mut self,
        level: u64,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.settings.set_minimum_galaxy_member_level(level, block)?;
        self.setting_changed(SettingChange::MinimumGalaxyMemberLevel(level));
        Ok(())
    }

    /// Flip `check`. Returns whether it is now enabled.
    pub fn toggle_check(
        &mut self,
        check: PersonhoodCheck,
        block: BlockNumber,
    ) -> Result<bool, PersonhoodError> {
        let enabled = self.settings.toggle_check(check, block)?;
        self.setting_changed(SettingChange::CheckToggled { check, enabled });
        Ok(enabled)
    }

    pub fn set_max_entities_per_passport(&mut self, max: u32) {
        self.graph.set_max_entities_per_passport(max);
        self.setting_changed(SettingChange::MaxEntitiesPerPassport(max));
    }

    pub fn set_whitelist_threshold(&mut self, percentage: u8) -> Result<(), PersonhoodError> {
        self.lists.set_whitelist_threshold(percentage)?;
        self.setting_changed(SettingChange::WhitelistThreshold(percentage));
        Ok(())
    }

    pub fn set_blacklist_threshold(&mut self, percentage: u8) -> Result<(), PersonhoodError> {
        self.lists.set_blacklist_threshold(percentage)?;
        self.setting_changed(SettingChange::BlacklistThreshold(percentage));
        Ok(())
    }

    pub fn set_signaling_threshold(&mut self, threshold: u64) {
        self.lists.set_signaling_threshold(threshold);
        self.setting_changed(SettingChange::SignalingThreshold(threshold));
    }

    // ── Linking ─────────────────────────────────────────────────────────

    pub fn link_entity_to_passport(
        &mut self,
        entity: &Account,
        passport: &Account,
    ) -> Result<(), PersonhoodError> {
        self.graph.request_link(entity, passport)?;
        self.emit(PassportEvent::LinkRequested {
            entity: entity.clone(),
            passport: passport.clone(),
        });
        Ok(())
    }

    pub fn accept_entity_link(
        &mut self,
        passport: &Account,
        entity: &Account,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.graph.accept_link(passport, entity, block)?;
        self.entity_linked(entity, passport, block);
        Ok(())
    }

    pub fn link_entity_to_passport_with_signature(
        &mut self,
        passport: &Account,
        authorization: &LinkAuthorization,
        signed: &SignedAuthorization,
        domain: &SigningDomain,
        now: Timestamp,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.graph
            .link_with_signature(passport, authorization, signed, domain, now, block)?;
        self.entity_linked(&authorization.entity, passport, block);
        Ok(())
    }

    fn entity_linked(&mut self, entity: &Account, passport: &Account, block: BlockNumber) {
        self.lists.on_entity_linked(entity, passport);
        self.emit(PassportEvent::EntityLinked {
            entity: entity.clone(),
            passport: passport.clone(),
            block,
        });
    }

    /// Remove an active link; `caller` is the entity or its passport.
    pub fn remove_entity_link(
        &mut self,
        caller: &Account,
        entity: &Account,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        let passport = self.graph.remove_link(caller, entity, block)?;
        self.lists.on_entity_unlinked(entity, &passport);
        self.emit(PassportEvent::LinkRemoved {
            entity: entity.clone(),
            passport,
            block,
        });
        Ok(())
    }

    pub fn deny_incoming_pending_entity_link(
        &mut self,
        passport: &Account,
        entity: &Account,
    ) -> Result<(), PersonhoodError> {
        self.graph.deny_link(passport, entity)?;
        self.emit(PassportEvent::LinkDenied {
            entity: entity.clone(),
            passport: passport.clone(),
        });
        Ok(())
    }

    pub fn cancel_outgoing_pending_entity_link(
        &mut self,
        entity: &Account,
    ) -> Result<(), PersonhoodError> {
        let passport = self.graph.cancel_link(entity)?;
        self.emit(PassportEvent::LinkCancelled {
            entity: entity.clone(),
            passport,
        });
        Ok(())
    }

    // ── Delegation ──────────────────────────────────────────────────────

    pub fn delegate_passport(
        &mut self,
        delegator: &Account,
        delegatee: &Account,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        let replaced = self.graph.delegatee_of(delegator).cloned();
        self.graph.request_delegation(delegator, delegatee, block)?;
        self.replaced_delegation(delegator, replaced, block);
        self.emit(PassportEvent::DelegationRequested {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
        });
        Ok(())
    }

    pub fn accept_delegation(
        &mut self,
        delegatee: &Account,
        delegator: &Account,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        self.graph.accept_delegation(delegatee, delegator, block)?;
        self.emit(PassportEvent::Delegated {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
            block,
        });
        Ok(())
    }

    pub fn delegate_with_signature(
        &mut self,
        delegatee: &Account,
        authorization: &DelegationAuthorization,
        signed: &SignedAuthorization,
        domain: &SigningDomain,
        now: Timestamp,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        let delegator = &authorization.delegator;
        let replaced = self.graph.delegatee_of(delegator).cloned();
        self.graph
            .delegate_with_signature(delegatee, authorization, signed, domain, now, block)?;
        self.replaced_delegation(delegator, replaced, block);
        self.emit(PassportEvent::Delegated {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
            block,
        });
        Ok(())
    }

    fn replaced_delegation(
        &mut self,
        delegator: &Account,
        replaced: Option<Account>,
        block: BlockNumber,
    ) {
        if let Some(delegatee) = replaced {
            self.emit(PassportEvent::DelegationRevoked {
                delegator: delegator.clone(),
                delegatee,
                block,
            });
        }
    }

    /// End the active delegation `caller` is part of, from either side.
    pub fn revoke_delegation(
        &mut self,
        caller: &Account,
        block: BlockNumber,
    ) -> Result<(), PersonhoodError> {
        let (delegator, delegatee) = self.graph.revoke_delegation(caller, block)?;
        self.emit(PassportEvent::DelegationRevoked {
            delegator,
            delegatee,
            block,
        });
        Ok(())
    }

    pub fn deny_incoming_pending_delegation(
        &mut self,
        delegatee: &Account,
        delegator: &Account,
    ) -> Result<(), PersonhoodError> {
        self.graph.deny_delegation(delegatee, delegator)?;
        self.emit(PassportEvent::DelegationDenied {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
        });
        Ok(())
    }

    pub fn cancel_outgoing_pending_delegation(
        &mut self,
        delegator: &Account,
    ) -> Result<(), PersonhoodError> {
        let delegatee = self.graph.cancel_delegation(delegator)?;
        self.emit(PassportEvent::DelegationCancelled {
            delegator: delegator.clone(),
            delegatee,
        });
        Ok(())
    }

    // ── Lists ───────────────────────────────────────────────────────────

    pub fn whitelist(&mut self, account: &Account) {
        if self.lists.whitelist(account, &self.graph) {
            self.listed(account, ListKind::Whitelist);
        }
    }

    pub fn blacklist(&mut self, account: &Account) {
        if self.lists.blacklist(account, &self.graph) {
            self.listed(account, ListKind::Blacklist);
        }
    }

    pub fn remove_from_whitelist(&mut self, account: &Account) {
        if self.lists.remove_from_whitelist(account, &self.graph) {
            self.unlisted(account, ListKind::Whitelist);
        }
    }

    pub fn remove_from_blacklist(&mut self, account: &Account) {
        if self.lists.remove_from_blacklist(account, &self.graph) {
            self.unlisted(account, ListKind::Blacklist);
        }
    }

    fn listed(&mut self, account: &Account, list: ListKind) {
        info!(%account, ?list, "account listed");
        self.emit(PassportEvent::Listed {
            account: account.clone(),
            list,
        });
    }

    fn unlisted(&mut self, account: &Account, list: ListKind) {
        info!(%account, ?list, "account unlisted");
        self.emit(PassportEvent::Unlisted {
            account: account.clone(),
            list,
        });
    }

    pub fn signal_user(&mut self, signaler: &Account, target: &Account, reason: Option<String>) {
        let outcome = self.lists.signal_user(signaler, target, &self.graph);
        self.emit(PassportEvent::Signaled {
            signaler: signaler.clone(),
            target: target.clone(),
            app: outcome.app,
            reason,
        });
    }

    /// Returns the number of signals cleared.
    pub fn reset_user_signals_with_reason(&mut self, target: &Account, reason: String) -> u64 {
        let cleared = self.lists.reset_user_signals(target, &self.graph);
        self.emit(PassportEvent::SignalsReset {
            target: target.clone(),
            cleared,
            reason,
        });
        cleared
    }

    pub fn assign_signaler_to_app(&mut self, signaler: &Account, app: AppId) {
        self.lists.assign_signaler_to_app(signaler, app);
        self.emit(PassportEvent::SignalerAssigned {
            signaler: signaler.clone(),
            app,
        });
    }

    pub fn remove_signaler_from_app(&mut self, signaler: &Account) -> Result<(), PersonhoodError> {
        let app = self.lists.remove_signaler_from_app(signaler)?;
        self.emit(PassportEvent::SignalerRemoved {
            signaler: signaler.clone(),
            app,
        });
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get_cumulative_score_with_decay(&self, account: &Account, round: Round) -> u64 {
        self.ledger.cumulative_score_with_decay(account, round)
    }

    pub fn user_round_score(&self, account: &Account, round: Round) -> u64 {
        self.ledger.round_score(account, round)
    }

    pub fn user_total_score(&self, account: &Account) -> u64 {
        self.ledger.total_score(account)
    }

    pub fn user_round_score_app(&self, account: &Account, round: Round, app: &AppId) -> u64 {
        self.ledger.round_score_by_app(account, round, app)
    }

    pub fn user_app_total_score(&self, account: &Account, app: &AppId) -> u64 {
        self.ledger.app_total_score(account, app)
    }

    pub fn security_multiplier(&self, level: SecurityLevel) -> u64 {
        self.ledger.params().security_multiplier(level)
    }

    pub fn decay_rate_at(&self, block: BlockNumber) -> u64 {
        self.ledger.decay_rate_at(block)
    }

    pub fn rounds_for_cumulative_score_at(&self, block: BlockNumber) -> u64 {
        self.ledger.params().rounds_for_cumulative_score_at(block)
    }

    pub fn threshold_pop_score_at(&self, block: BlockNumber) -> u64 {
        self.settings.threshold_pop_score_at(block)
    }

    pub fn minimum_galaxy_member_level_at(&self, block: BlockNumber) -> u64 {
        self.settings.minimum_galaxy_member_level_at(block)
    }

    pub fn is_check_enabled(&self, check: PersonhoodCheck) -> bool {
        self.settings.is_check_enabled(check)
    }

    pub fn is_passport(&self, account: &Account) -> bool {
        self.graph.is_passport(account)
    }

    pub fn is_entity(&self, account: &Account) -> bool {
        self.graph.is_entity(account)
    }

    pub fn is_delegator(&self, account: &Account) -> bool {
        self.graph.is_delegator(account)
    }

    pub fn is_delegatee(&self, account: &Account) -> bool {
        self.graph.is_delegatee(account)
    }

    pub fn get_passport_for_entity(&self, entity: &Account) -> Option<Account> {
        self.graph.passport_for_entity(entity).cloned()
    }

    pub fn get_entities_linked_to_passport(&self, passport: &Account) -> Vec<Account> {
        self.graph.entities_of(passport).to_vec()
    }

    pub fn get_delegatee(&self, delegator: &Account) -> Option<Account> {
        self.graph.delegatee_of(delegator).cloned()
    }

    pub fn get_delegator(&self, delegatee: &Account) -> Option<Account> {
        self.graph.delegator_of(delegatee).cloned()
    }

    pub fn get_pending_linkings(&self, account: &Account) -> PendingLinks {
        self.graph.pending_links(account)
    }

    pub fn get_pending_delegations(&self, account: &Account) -> PendingDelegations {
        self.graph.pending_delegations(account)
    }

    pub fn is_entity_in_timepoint(&self, account: &Account, block: BlockNumber) -> bool {
        self.graph.is_entity_at(account, block)
    }

    pub fn is_passport_in_timepoint(&self, account: &Account, block: BlockNumber) -> bool {
        self.graph.is_passport_at(account, block)
    }

    pub fn get_passport_for_entity_at_timepoint(
        &self,
        entity: &Account,
        block: BlockNumber,
    ) -> Option<Account> {
        self.graph.passport_for_entity_at(entity, block)
    }

    pub fn entities_of_passport_at_timepoint(
        &self,
        passport: &Account,
        block: BlockNumber,
    ) -> Vec<Account> {
        self.graph.entities_of_at(passport, block)
    }

    pub fn get_delegatee_in_timepoint(
        &self,
        delegator: &Account,
        block: BlockNumber,
    ) -> Option<Account> {
        self.graph.delegatee_at(delegator, block)
    }

    pub fn get_delegator_in_timepoint(
        &self,
        delegatee: &Account,
        block: BlockNumber,
    ) -> Option<Account> {
        self.graph.delegator_at(delegatee, block)
    }

    pub fn is_whitelisted(&self, account: &Account) -> bool {
        self.lists.is_whitelisted(account)
    }

    pub fn is_blacklisted(&self, account: &Account) -> bool {
        self.lists.is_blacklisted(account)
    }

    pub fn is_passport_whitelisted(&self, account: &Account) -> bool {
        self.lists.is_passport_whitelisted(account, &self.graph)
    }

    pub fn is_passport_blacklisted(&self, account: &Account) -> bool {
        self.lists.is_passport_blacklisted(account, &self.graph)
    }

    pub fn is_passport_whitelisted_at(&self, account: &Account, block: BlockNumber) -> bool {
        self.lists
            .is_passport_whitelisted_at(account, block, &self.graph)
    }

    pub fn is_passport_blacklisted_at(&self, account: &Account, block: BlockNumber) -> bool {
        self.lists
            .is_passport_blacklisted_at(account, block, &self.graph)
    }

    pub fn signaled_counter(&self, account: &Account) -> u64 {
        self.lists.signal_count(account)
    }

    pub fn app_signals_counter(&self, app: &AppId) -> u64 {
        self.lists.app_signals(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegistry(SecurityLevel);

    impl AppRegistry for FixedRegistry {
        fn security_level_of(&self, _app: &AppId) -> SecurityLevel {
            self.0
        }
    }

    fn account(name: &str) -> Account {
        Account::new(format!("pass_{name}"))
    }

    fn state() -> PassportState {
        PassportState::from_config(&PassportConfig::default(), BlockNumber::GENESIS).unwrap()
    }

    #[test]
    fn genesis_follows_config() {
        let config = PassportConfig {
            enabled_checks: vec![PersonhoodCheck::Blacklist],
            decay_rate: 20,
            ..PassportConfig::default()
        };
        let state = PassportState::from_config(&config, BlockNumber(3)).unwrap();
        assert!(state.is_check_enabled(PersonhoodCheck::Blacklist));
        assert!(!state.is_check_enabled(PersonhoodCheck::Whitelist));
        assert_eq!(state.decay_rate_at(BlockNumber(3)), 20);
        assert_eq!(state.threshold_pop_score_at(BlockNumber(3)), 2000);
        assert_eq!(state.security_multiplier(SecurityLevel::Medium), 200);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PassportConfig {
            decay_rate: 101,
            ..PassportConfig::default()
        };
        assert!(matches!(
            PassportState::from_config(&config, BlockNumber::GENESIS),
            Err(PersonhoodError::Score(_))
        ));
        let config = PassportConfig {
            blacklist_threshold: 150,
            ..PassportConfig::default()
        };
        assert!(matches!(
            PassportState::from_config(&config, BlockNumber::GENESIS),
            Err(PersonhoodError::List(_))
        ));
    }

    #[test]
    fn app_security_override_wins_over_registry() {
        let mut state = state();
        let app = AppId::from_name("app");
        let registry = FixedRegistry(SecurityLevel::Low);
        let user = account("user");

        assert_eq!(state.effective_app_security(&app, &registry), SecurityLevel::Low);
        assert_eq!(state.register_action(&user, app, Round(1), SecurityLevel::Low).unwrap(), 100);
        state.set_app_security(app, SecurityLevel::High);
        assert_eq!(state.effective_app_security(&app, &registry), SecurityLevel::High);
        assert_eq!(state.register_action(&user, app, Round(1), SecurityLevel::Low).unwrap(), 400);
        assert_eq!(state.user_round_score(&user, Round(1)), 500);
        assert_eq!(state.user_round_score_app(&user, Round(1), &app), 500);
    }

    #[test]
    fn blacklisted_account_records_zero() {
        let mut state = state();
        let app = AppId::from_name("app");
        let user = account("user");
        state.blacklist(&user);

        let points = state
            .register_aggregated_actions_for_round(&user, app, Round(2), 800)
            .unwrap();
        assert_eq!(points, 0);
        assert_eq!(state.user_total_score(&user), 0);
        assert!(state.ledger().has_round_entry(&user, Round(2)));
    }

    #[test]
    fn entity_actions_credit_passport() {
        let mut state = state();
        let (entity, passport) = (account("entity"), account("passport"));
        let app = AppId::from_name("app");
        state.link_entity_to_passport(&entity, &passport).unwrap();
        state.accept_entity_link(&passport, &entity, BlockNumber(1)).unwrap();

        state
            .register_aggregated_actions_for_round(&entity, app, Round(1), 300)
            .unwrap();
        assert_eq!(state.user_round_score(&passport, Round(1)), 300);
        assert_eq!(state.user_round_score(&entity, Round(1)), 0);
    }

    #[test]
    fn events_buffer_until_taken() {
        let mut state = state();
        let (entity, passport) = (account("entity"), account("passport"));
        state.link_entity_to_passport(&entity, &passport).unwrap();
        state.whitelist(&entity);
        state.whitelist(&entity);

        let events = state.take_events();
        assert_eq!(
            events,
            vec![
                PassportEvent::LinkRequested {
                    entity: entity.clone(),
                    passport: passport.clone()
                },
                PassportEvent::Listed {
                    account: entity.clone(),
                    list: ListKind::Whitelist
                },
            ]
        );
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn replacing_active_delegation_reports_revocation() {
        let mut state = state();
        let (a, b, c) = (account("a"), account("b"), account("c"));
        state.delegate_passport(&a, &b, BlockNumber(1)).unwrap();
        state.accept_delegation(&b, &a, BlockNumber(1)).unwrap();
        state.take_events();

        state.delegate_passport(&a, &c, BlockNumber(2)).unwrap();
        assert_eq!(
            state.take_events(),
            vec![
                PassportEvent::DelegationRevoked {
                    delegator: a.clone(),
                    delegatee: b.clone(),
                    block: BlockNumber(2)
                },
                PassportEvent::DelegationRequested {
                    delegator: a.clone(),
                    delegatee: c.clone()
                },
            ]
        );
    }
}
