//! Signal counters and app signalers.
//!
//! A signal is a moderation flag raised against an account. Signals on an
//! active entity are counted twice: on the entity and on its passport.

use crate::error::ListError;
use crate::manager::{decrement, ListManager};
use passport_links::LinkGraph;
use passport_types::{Account, AppId};
use tracing::debug;

/// What a signal touched, for the caller's event log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalOutcome {
    /// Passport that also received the signal, if the target is an entity.
    pub passport: Option<Account>,
    /// App credited with the signal, if the signaler is assigned to one.
    pub app: Option<AppId>,
}

impl ListManager {
    pub fn signal_count(&self, account: &Account) -> u64 {
        self.signaled.get(account).copied().unwrap_or(0)
    }

    pub fn signaling_threshold(&self) -> u64 {
        self.signaling_threshold
    }

    pub fn set_signaling_threshold(&mut self, threshold: u64) {
        self.signaling_threshold = threshold;
    }

    /// Whether `account` has reached the signaling threshold.
    pub fn is_signaled(&self, account: &Account) -> bool {
        self.signal_count(account) >= self.signaling_threshold
    }

    pub fn signal_user(
        &mut self,
        signaler: &Account,
        target: &Account,
        graph: &LinkGraph,
    ) -> SignalOutcome {
        *self.signaled.entry(target.clone()).or_default() += 1;

        let passport = graph.passport_for_entity(target).cloned();
        if let Some(passport) = &passport {
            *self.signaled.entry(passport.clone()).or_default() += 1;
        }
        let app = self.app_signalers.get(signaler).copied();
        if let Some(app) = app {
            *self.app_signals.entry(app).or_default() += 1;
        }
        debug!(%signaler, %target, count = self.signal_count(target), "signaled");
        SignalOutcome { passport, app }
    }

    /// Zero `target`'s counter. Returns the number of signals cleared.
    ///
    /// If `target` is an active entity its passport's aggregate drops by the
    /// same amount. App counters are a tally of signals raised and stay.
    pub fn reset_user_signals(&mut self, target: &Account, graph: &LinkGraph) -> u64 {
        let cleared = self.signaled.remove(target).unwrap_or(0);
        if cleared > 0 {
            if let Some(passport) = graph.passport_for_entity(target) {
                decrement(&mut self.signaled, passport, cleared);
            }
        }
        debug!(%target, cleared, "signals reset");
        cleared
    }

    // ── App signalers ───────────────────────────────────────────────────

    /// Assign `signaler` to `app`, replacing any earlier assignment.
    pub fn assign_signaler_to_app(&mut self, signaler: &Account, app: AppId) {
        self.app_signalers.insert(signaler.clone(), app);
    }

    /// Returns the app the signaler was assigned to.
    pub fn remove_signaler_from_app(&mut self, signaler: &Account) -> Result<AppId, ListError> {
        self.app_signalers
            .remove(signaler)
            .ok_or_else(|| ListError::NotAppSignaler(signaler.clone()))
    }

    pub fn app_of_signaler(&self, signaler: &Account) -> Option<AppId> {
        self.app_signalers.get(signaler).copied()
    }

    pub fn app_signals(&self, app: &AppId) -> u64 {
        self.app_signals.get(app).copied().unwrap_or(0)
    }
}
