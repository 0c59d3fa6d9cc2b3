//! Transactional front door to the passport state.
//!
//! The service keeps two copies of the state: the committed copy readers
//! see, and a standby copy owned by the writer mutex. A write applies its
//! operation to the standby copy in place, swaps it in as the committed
//! copy, then replays the same operation on the copy it displaced so both
//! agree again. Readers take the committed copy's `Arc` and never wait for a
//! write in progress. A copy is cloned only while a reader still holds it.
//!
//! Operations check everything before they write, so a failed write leaves
//! nothing behind, not even its events. Writes at a block older than the
//! newest committed one are rejected up front, which keeps checkpoint
//! pushes from failing halfway.

use crate::collaborators::{Collaborators, Role};
use crate::config::PassportConfig;
use crate::evaluator::PersonhoodReason;
use crate::events::PassportEvent;
use crate::snapshot::StateSnapshot;
use crate::state::PassportState;
use crate::PersonhoodError;
use parking_lot::{Mutex, RwLock};
use passport_checkpoints::CheckpointError;
use passport_crypto::{DelegationAuthorization, LinkAuthorization, SignedAuthorization, SigningDomain};
use passport_types::{Account, AppId, BlockNumber, PersonhoodCheck, Round, SecurityLevel};
use std::sync::Arc;
use tracing::subscriber::NoSubscriber;
use tracing::{info, warn};

pub struct PassportService {
    committed: RwLock<Arc<PassportState>>,
    /// Standby copy, one operation behind `committed` only during a write.
    writer: Mutex<Arc<PassportState>>,
    events: Mutex<Vec<PassportEvent>>,
    collaborators: Collaborators,
    domain: SigningDomain,
}

impl PassportService {
    /// Start from the genesis state described by `config`. Settings are
    /// checkpointed at block zero so they answer for any earlier block too.
    pub fn new(config: &PassportConfig, collaborators: Collaborators) -> Result<Self, PersonhoodError> {
        let state = PassportState::from_config(config, BlockNumber::GENESIS)?;
        let block = collaborators.clock.block_number();
        info!(%block, network = config.network.as_str(), "passport service started");
        Ok(Self::with_state(state, config, collaborators))
    }

    /// Resume from a snapshot produced by [`PassportService::save_snapshot`].
    pub fn from_snapshot(
        bytes: &[u8],
        config: &PassportConfig,
        collaborators: Collaborators,
    ) -> Result<Self, PersonhoodError> {
        let snapshot = StateSnapshot::decode(bytes)?;
        info!(schema_version = snapshot.schema_version, "passport service restored");
        Ok(Self::with_state(snapshot.state, config, collaborators))
    }

    fn with_state(state: PassportState, config: &PassportConfig, collaborators: Collaborators) -> Self {
        let state = Arc::new(state);
        Self {
            committed: RwLock::new(Arc::clone(&state)),
            writer: Mutex::new(state),
            events: Mutex::new(Vec::new()),
            collaborators,
            domain: SigningDomain::new(config.signing_domain_name.clone(), config.network),
        }
    }

    pub fn signing_domain(&self) -> &SigningDomain {
        &self.domain
    }

    /// The committed state. Holding it does not block writers.
    pub fn view(&self) -> Arc<PassportState> {
        self.committed.read().clone()
    }

    /// Events of every operation committed since the last drain, in order.
    pub fn drain_events(&self) -> Vec<PassportEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn save_snapshot(&self) -> Result<Vec<u8>, PersonhoodError> {
        StateSnapshot::new((*self.view()).clone()).encode()
    }

    /// Replace the committed state with a decoded snapshot.
    pub fn load_snapshot(&self, bytes: &[u8]) -> Result<(), PersonhoodError> {
        let snapshot = StateSnapshot::decode(bytes)?;
        let mut standby = self.writer.lock();
        *standby = Arc::new(snapshot.state);
        *self.committed.write() = Arc::clone(&standby);
        info!(schema_version = snapshot.schema_version, "snapshot loaded");
        Ok(())
    }

    /// Run `apply` as one write. It runs twice on success, once per copy,
    /// and must give the same result both times.
    fn transact<T>(
        &self,
        operation: &'static str,
        apply: impl Fn(&mut PassportState, BlockNumber) -> Result<T, PersonhoodError>,
    ) -> Result<T, PersonhoodError> {
        let mut standby = self.writer.lock();
        let block = self.collaborators.clock.block_number();

        let latest = standby.latest_block();
        if block < latest {
            let err = PersonhoodError::from(CheckpointError::OutOfOrder {
                latest,
                attempted: block,
            });
            warn!(operation, %block, error = %err, "operation rejected");
            return Err(err);
        }

        let next = Arc::make_mut(&mut *standby);
        let value = match apply(&mut *next, block) {
            Ok(value) => value,
            Err(err) => {
                warn!(operation, %block, error = %err, "operation rejected");
                return Err(err);
            }
        };
        next.advance_to(block);
        let events = next.take_events();

        let previous = std::mem::replace(&mut *self.committed.write(), Arc::clone(&standby));
        *standby = previous;

        let replayed = tracing::subscriber::with_default(NoSubscriber::default(), || {
            let behind = Arc::make_mut(&mut *standby);
            let result = apply(&mut *behind, block).map(|_| ());
            behind.advance_to(block);
            behind.take_events();
            result
        });
        if let Err(err) = replayed {
            warn!(operation, %block, error = %err, "standby replay diverged, sharing committed copy");
            *standby = self.view();
        }

        self.events.lock().extend(events);
        Ok(value)
    }

    fn require(&self, caller: &Account, role: Role) -> Result<(), PersonhoodError> {
        if self.collaborators.access.has_role(caller, role) {
            Ok(())
        } else {
            Err(PersonhoodError::MissingRole {
                account: caller.clone(),
                role,
            })
        }
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// Credit an action in the current round.
    pub fn register_action(
        &self,
        caller: &Account,
        account: &Account,
        app: AppId,
    ) -> Result<u64, PersonhoodError> {
        let round = self.collaborators.rounds.current_round();
        self.register_action_for_round(caller, account, app, round)
    }

    pub fn register_action_for_round(
        &self,
        caller: &Account,
        account: &Account,
        app: AppId,
        round: Round,
    ) -> Result<u64, PersonhoodError> {
        self.require(caller, Role::ActionRegistrar)?;
        let registry_level = self.collaborators.apps.security_level_of(&app);
        self.transact("register_action", |state, _| {
            state.register_action(account, app, round, registry_level)
        })
    }

    pub fn register_aggregated_actions_for_round(
        &self,
        caller: &Account,
        account: &Account,
        app: AppId,
        round: Round,
        points: u64,
    ) -> Result<u64, PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("register_aggregated_actions_for_round", |state, _| {
            state.register_aggregated_actions_for_round(account, app, round, points)
        })
    }

    // ── Score settings ──────────────────────────────────────────────────

    pub fn set_threshold_pop_score(&self, caller: &Account, threshold: u64) -> Result<(), PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("set_threshold_pop_score", |state, block| {
            state.set_threshold_pop_score(threshold, block)
        })
    }

    pub fn set_decay_rate(&self, caller: &Account, rate: u64) -> Result<(), PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("set_decay_rate", |state, block| state.set_decay_rate(rate, block))
    }

    pub fn set_rounds_for_cumulative_score(
        &self,
        caller: &Account,
        rounds: u64,
    ) -> Result<(), PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("set_rounds_for_cumulative_score", |state, block| {
            state.set_rounds_for_cumulative_score(rounds, block)
        })
    }

    pub fn set_security_multiplier(
        &self,
        caller: &Account,
        level: SecurityLevel,
        multiplier: u64,
    ) -> Result<(), PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("set_security_multiplier", |state, _| {
            state.set_security_multiplier(level, multiplier);
            Ok(())
        })
    }

    pub fn set_app_security(
        &self,
        caller: &Account,
        app: AppId,
        level: SecurityLevel,
    ) -> Result<(), PersonhoodError> {
        self.require(caller, Role::ScoreManager)?;
        self.transact("set_app_security", |state, _| {
            state.set_app_security(app, level);
            Ok(())
        })
    }

    /// Security level `app` is scored at, falling back to the registry.
    pub fn app_security(&self, app: &AppId) -> SecurityLevel {
        self.view()
            .effective_app_security(app, self.collaborators.apps.as_ref())
    }

    // ── Evaluator settings ──────────────────────────────────────────────

    pub fn set_minimum_galaxy_member_level(
        &self,
        caller: &Account,
        level: u64,
    ) -> Result<(), PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("set_minimum_galaxy_member_level", |state, block| {
            state.set_minimum_galaxy_member_level(level, block)
        })
    }

    /// Flip `check`. Returns whether it is now enabled.
    pub fn toggle_check(&self, caller: &Account, check: PersonhoodCheck) -> Result<bool, PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("toggle_check", |state, block| state.toggle_check(check, block))
    }

    pub fn set_max_entities_per_passport(&self, caller: &Account, max: u32) -> Result<(), PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("set_max_entities_per_passport", |state, _| {
            state.set_max_entities_per_passport(max);
            Ok(())
        })
    }

    pub fn set_whitelist_threshold(&self, caller: &Account, percentage: u8) -> Result<(), PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("set_whitelist_threshold", |state, _| {
            state.set_whitelist_threshold(percentage)
        })
    }

    pub fn set_blacklist_threshold(&self, caller: &Account, percentage: u8) -> Result<(), PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("set_blacklist_threshold", |state, _| {
            state.set_blacklist_threshold(percentage)
        })
    }

    pub fn set_signaling_threshold(&self, caller: &Account, threshold: u64) -> Result<(), PersonhoodError> {
        self.require(caller, Role::SettingsManager)?;
        self.transact("set_signaling_threshold", |state, _| {
            state.set_signaling_threshold(threshold);
            Ok(())
        })
    }

    // ── Linking ─────────────────────────────────────────────────────────

    /// `caller` asks to become an entity of `passport`.
    pub fn link_entity_to_passport(&self, caller: &Account, passport: &Account) -> Result<(), PersonhoodError> {
        self.transact("link_entity_to_passport", |state, _| {
            state.link_entity_to_passport(caller, passport)
        })
    }

    pub fn accept_entity_link(&self, caller: &Account, entity: &Account) -> Result<(), PersonhoodError> {
        self.transact("accept_entity_link", |state, block| {
            state.accept_entity_link(caller, entity, block)
        })
    }

    pub fn remove_entity_link(&self, caller: &Account, entity: &Account) -> Result<(), PersonhoodError> {
        self.transact("remove_entity_link", |state, block| {
            state.remove_entity_link(caller, entity, block)
        })
    }

    pub fn deny_incoming_pending_entity_link(
        &self,
        caller: &Account,
        entity: &Account,
    ) -> Result<(), PersonhoodError> {
        self.transact("deny_incoming_pending_entity_link", |state, _| {
            state.deny_incoming_pending_entity_link(caller, entity)
        })
    }

    pub fn cancel_outgoing_pending_entity_link(&self, caller: &Account) -> Result<(), PersonhoodError> {
        self.transact("cancel_outgoing_pending_entity_link", |state, _| {
            state.cancel_outgoing_pending_entity_link(caller)
        })
    }

    /// Passport `caller` submits an entity's signed consent.
    pub fn link_entity_to_passport_with_signature(
        &self,
        caller: &Account,
        authorization: &LinkAuthorization,
        signed: &SignedAuthorization,
    ) -> Result<(), PersonhoodError> {
        let now = self.collaborators.clock.now();
        self.transact("link_entity_to_passport_with_signature", |state, block| {
            state.link_entity_to_passport_with_signature(
                caller,
                authorization,
                signed,
                &self.domain,
                now,
                block,
            )
        })
    }

    // ── Delegation ──────────────────────────────────────────────────────

    /// `caller` asks `delegatee` to take over its personhood.
    pub fn delegate_passport(&self, caller: &Account, delegatee: &Account) -> Result<(), PersonhoodError> {
        self.transact("delegate_passport", |state, block| {
            state.delegate_passport(caller, delegatee, block)
        })
    }

    pub fn accept_delegation(&self, caller: &Account, delegator: &Account) -> Result<(), PersonhoodError> {
        self.transact("accept_delegation", |state, block| {
            state.accept_delegation(caller, delegator, block)
        })
    }

    pub fn revoke_delegation(&self, caller: &Account) -> Result<(), PersonhoodError> {
        self.transact("revoke_delegation", |state, block| {
            state.revoke_delegation(caller, block)
        })
    }

    pub fn deny_incoming_pending_delegation(
        &self,
        caller: &Account,
        delegator: &Account,
    ) -> Result<(), PersonhoodError> {
        self.transact("deny_incoming_pending_delegation", |state, _| {
            state.deny_incoming_pending_delegation(caller, delegator)
        })
    }

    pub fn cancel_outgoing_pending_delegation(&self, caller: &Account) -> Result<(), PersonhoodError> {
        self.transact("cancel_outgoing_pending_delegation", |state, _| {
            state.cancel_outgoing_pending_delegation(caller)
        })
    }

    /// Delegatee `caller` submits the delegator's signed consent.
    pub fn delegate_with_signature(
        &self,
        caller: &Account,
        authorization: &DelegationAuthorization,
        signed: &SignedAuthorization,
    ) -> Result<(), PersonhoodError> {
        let now = self.collaborators.clock.now();
        self.transact("delegate_with_signature", |state, block| {
            state.delegate_with_signature(caller, authorization, signed, &self.domain, now, block)
        })
    }

    // ── Lists ───────────────────────────────────────────────────────────

    pub fn whitelist(&self, caller: &Account, account: &Account) -> Result<(), PersonhoodError> {
        self.require(caller, Role::Whitelister)?;
        self.transact("whitelist", |state, _| {
            state.whitelist(account);
            Ok(())
        })
    }

    pub fn blacklist(&self, caller: &Account, account: &Account) -> Result<(), PersonhoodError> {
        self.require(caller, Role::Whitelister)?;
        self.transact("blacklist", |state, _| {
            state.blacklist(account);
            Ok(())
        })
    }

    pub fn remove_from_whitelist(&self, caller: &Account, account: &Account) -> Result<(), PersonhoodError> {
        self.require(caller, Role::Whitelister)?;
        self.transact("remove_from_whitelist", |state, _| {
            state.remove_from_whitelist(account);
            Ok(())
        })
    }

    pub fn remove_from_blacklist(&self, caller: &Account, account: &Account) -> Result<(), PersonhoodError> {
        self.require(caller, Role::Whitelister)?;
        self.transact("remove_from_blacklist", |state, _| {
            state.remove_from_blacklist(account);
            Ok(())
        })
    }

    pub fn signal_user(&self, caller: &Account, target: &Account) -> Result<(), PersonhoodError> {
        self.signal(caller, target, None)
    }

    pub fn signal_user_with_reason(
        &self,
        caller: &Account,
        target: &Account,
        reason: impl Into<String>,
    ) -> Result<(), PersonhoodError> {
        self.signal(caller, target, Some(reason.into()))
    }

    /// Signalers hold the role or are assigned to an app.
    fn signal(&self, caller: &Account, target: &Account, reason: Option<String>) -> Result<(), PersonhoodError> {
        let has_role = self.collaborators.access.has_role(caller, Role::Signaler);
        self.transact("signal_user", |state, _| {
            if !has_role && state.lists().app_of_signaler(caller).is_none() {
                return Err(PersonhoodError::MissingRole {
                    account: caller.clone(),
                    role: Role::Signaler,
                });
            }
            state.signal_user(caller, target, reason.clone());
            Ok(())
        })
    }

    /// Returns the number of signals cleared.
    pub fn reset_user_signals_with_reason(
        &self,
        caller: &Account,
        target: &Account,
        reason: impl Into<String>,
    ) -> Result<u64, PersonhoodError> {
        self.require(caller, Role::Signaler)?;
        let reason = reason.into();
        self.transact("reset_user_signals_with_reason", |state, _| {
            Ok(state.reset_user_signals_with_reason(target, reason.clone()))
        })
    }

    pub fn assign_signaler_to_app(
        &self,
        caller: &Account,
        signaler: &Account,
        app: AppId,
    ) -> Result<(), PersonhoodError> {
        self.require(caller, Role::RoleGranter)?;
        self.transact("assign_signaler_to_app", |state, _| {
            state.assign_signaler_to_app(signaler, app);
            Ok(())
        })
    }

    pub fn remove_signaler_from_app(&self, caller: &Account, signaler: &Account) -> Result<(), PersonhoodError> {
        self.require(caller, Role::RoleGranter)?;
        self.transact("remove_signaler_from_app", |state, _| {
            state.remove_signaler_from_app(signaler)
        })
    }

    // ── Evaluation ──────────────────────────────────────────────────────

    pub fn is_person(&self, account: &Account) -> (bool, PersonhoodReason) {
        self.view().is_person(
            account,
            self.collaborators.tiers.as_ref(),
            self.collaborators.rounds.as_ref(),
        )
    }

    pub fn is_person_at_timepoint(&self, account: &Account, block: BlockNumber) -> (bool, PersonhoodReason) {
        self.view().is_person_at_timepoint(
            account,
            block,
            self.collaborators.tiers.as_ref(),
            self.collaborators.rounds.as_ref(),
        )
    }
}
