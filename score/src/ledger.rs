//! Per-account score bookkeeping.

use crate::decay::cumulative_with_decay;
use crate::error::ScoreError;
use crate::params::ScoreParams;
use passport_types::{Account, AppId, BlockNumber, Round, SecurityLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points earned by accounts, bucketed by round and application.
///
/// The ledger credits whichever account it is given. Deciding *who* gets the
/// points (an entity's passport) and *how many* (zero while blacklisted) is
/// up to the caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreLedger {
    round_score_by_app: HashMap<(Account, Round, AppId), u64>,
    round_score: HashMap<(Account, Round), u64>,
    total_score: HashMap<Account, u64>,
    app_total_score: HashMap<(Account, AppId), u64>,
    params: ScoreParams,
}

impl ScoreLedger {
    pub fn new(params: ScoreParams) -> Self {
        Self {
            round_score_by_app: HashMap::new(),
            round_score: HashMap::new(),
            total_score: HashMap::new(),
            app_total_score: HashMap::new(),
            params,
        }
    }

    pub fn params(&self) -> &ScoreParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ScoreParams {
        &mut self.params
    }

    /// Points one action in an app of `level` is worth.
    pub fn points_for(&self, level: SecurityLevel) -> u64 {
        self.params.security_multiplier(level)
    }

    /// Add `points` to every score bucket of `account`.
    ///
    /// Recording zero points still creates the round entries, so a
    /// blacklisted account's action leaves a trace in the round bookkeeping.
    /// All sums are checked before anything is written.
    pub fn record(
        &mut self,
        account: &Account,
        app: AppId,
        round: Round,
        points: u64,
    ) -> Result<u64, ScoreError> {
        let overflow = || ScoreError::Overflow(account.to_string());
        let by_app = self
            .round_score_by_app(account, round, &app)
            .checked_add(points)
            .ok_or_else(overflow)?;
        let in_round = self
            .round_score(account, round)
            .checked_add(points)
            .ok_or_else(overflow)?;
        let total = self
            .total_score(account)
            .checked_add(points)
            .ok_or_else(overflow)?;
        let app_total = self
            .app_total_score(account, &app)
            .checked_add(points)
            .ok_or_else(overflow)?;

        self.round_score_by_app
            .insert((account.clone(), round, app), by_app);
        self.round_score.insert((account.clone(), round), in_round);
        self.total_score.insert(account.clone(), total);
        self.app_total_score.insert((account.clone(), app), app_total);
        Ok(points)
    }

    pub fn round_score(&self, account: &Account, round: Round) -> u64 {
        self.round_score
            .get(&(account.clone(), round))
            .copied()
            .unwrap_or(0)
    }

    pub fn round_score_by_app(&self, account: &Account, round: Round, app: &AppId) -> u64 {
        self.round_score_by_app
            .get(&(account.clone(), round, *app))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_score(&self, account: &Account) -> u64 {
        self.total_score.get(account).copied().unwrap_or(0)
    }

    pub fn app_total_score(&self, account: &Account, app: &AppId) -> u64 {
        self.app_total_score
            .get(&(account.clone(), *app))
            .copied()
            .unwrap_or(0)
    }

    /// Whether any action (even a zero-point one) was recorded for the round.
    pub fn has_round_entry(&self, account: &Account, round: Round) -> bool {
        self.round_score.contains_key(&(account.clone(), round))
    }

    /// Decayed cumulative score over the configured window ending at `upto`.
    pub fn cumulative_score_with_decay(&self, account: &Account, upto: Round) -> u64 {
        cumulative_with_decay(
            upto,
            self.params.rounds_for_cumulative_score(),
            self.params.decay_rate(),
            |round| self.round_score(account, round),
        )
    }

    pub fn decay_rate_at(&self, block: BlockNumber) -> u64 {
        self.params.decay_rate_at(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account::new(format!("pass_{name}"))
    }

    fn ledger(decay: u64) -> ScoreLedger {
        ScoreLedger::new(ScoreParams::new(decay, 12, BlockNumber(0)).unwrap())
    }

    #[test]
    fn record_updates_every_bucket() {
        let mut ledger = ledger(0);
        let alice = account("alice");
        let app = AppId::from_name("mugshot");
        let other = AppId::from_name("greencart");

        ledger.record(&alice, app, Round(1), 100).unwrap();
        ledger.record(&alice, other, Round(1), 200).unwrap();
        ledger.record(&alice, app, Round(2), 100).unwrap();

        assert_eq!(ledger.round_score_by_app(&alice, Round(1), &app), 100);
        assert_eq!(ledger.round_score(&alice, Round(1)), 300);
        assert_eq!(ledger.round_score(&alice, Round(2)), 100);
        assert_eq!(ledger.total_score(&alice), 400);
        assert_eq!(ledger.app_total_score(&alice, &app), 200);
    }

    #[test]
    fn zero_points_still_leave_round_entry() {
        let mut ledger = ledger(0);
        let bob = account("bob");
        ledger
            .record(&bob, AppId::from_name("mugshot"), Round(3), 0)
            .unwrap();
        assert!(ledger.has_round_entry(&bob, Round(3)));
        assert_eq!(ledger.total_score(&bob), 0);
    }

    #[test]
    fn overflow_leaves_ledger_untouched() {
        let mut ledger = ledger(0);
        let carol = account("carol");
        let app = AppId::from_name("mugshot");
        ledger.record(&carol, app, Round(1), u64::MAX).unwrap();
        assert!(matches!(
            ledger.record(&carol, app, Round(2), 1),
            Err(ScoreError::Overflow(_))
        ));
        assert!(!ledger.has_round_entry(&carol, Round(2)));
        assert_eq!(ledger.total_score(&carol), u64::MAX);
    }

    #[test]
    fn cumulative_uses_recorded_rounds() {
        let mut ledger = ledger(20);
        let dave = account("dave");
        let app = AppId::from_name("mugshot");
        for (round, points) in [(1, 100), (2, 100), (3, 200), (4, 200), (5, 400)] {
            ledger.record(&dave, app, Round(round), points).unwrap();
        }
        assert_eq!(ledger.cumulative_score_with_decay(&dave, Round(5)), 780);
    }

    #[test]
    fn parameter_change_affects_only_future_computations() {
        let mut ledger = ledger(0);
        let erin = account("erin");
        let app = AppId::from_name("mugshot");
        ledger.record(&erin, app, Round(1), 100).unwrap();
        ledger.record(&erin, app, Round(2), 100).unwrap();
        assert_eq!(ledger.cumulative_score_with_decay(&erin, Round(2)), 200);

        ledger
            .params_mut()
            .set_decay_rate(50, BlockNumber(5))
            .unwrap();
        assert_eq!(ledger.round_score(&erin, Round(1)), 100);
        assert_eq!(ledger.cumulative_score_with_decay(&erin, Round(2)), 150);
    }
}
