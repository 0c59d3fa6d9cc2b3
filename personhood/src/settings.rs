//! Checkpointed evaluator settings.

use passport_checkpoints::{CheckpointError, Checkpoints};
use passport_types::{BlockNumber, CheckSet, PersonhoodCheck};
use serde::{Deserialize, Serialize};

/// Values the evaluator compares against, plus the enabled-check bitmask.
///
/// Everything is checkpointed so a round's eligibility math can be replayed
/// at its snapshot block. The evaluator reads the bitmask live, though: a
/// check switched off mid-round is off for that round too.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonhoodSettings {
    threshold_pop_score: Checkpoints<u64>,
    minimum_galaxy_member_level: Checkpoints<u64>,
    checks: Checkpoints<CheckSet>,
}

impl PersonhoodSettings {
    pub fn new(
        threshold_pop_score: u64,
        minimum_galaxy_member_level: u64,
        checks: CheckSet,
        genesis: BlockNumber,
    ) -> Self {
        Self {
            threshold_pop_score: Checkpoints::starting_at(genesis, threshold_pop_score),
            minimum_galaxy_member_level: Checkpoints::starting_at(
                genesis,
                minimum_galaxy_member_level,
            ),
            checks: Checkpoints::starting_at(genesis, checks),
        }
    }

    pub fn threshold_pop_score(&self) -> u64 {
        self.threshold_pop_score.current()
    }

    pub fn threshold_pop_score_at(&self, block: BlockNumber) -> u64 {
        self.threshold_pop_score.value_at(block)
    }

    pub fn set_threshold_pop_score(
        &mut self,
        threshold: u64,
        block: BlockNumber,
    ) -> Result<(), CheckpointError> {
        self.threshold_pop_score.push(block, threshold)
    }

    pub fn minimum_galaxy_member_level(&self) -> u64 {
        self.minimum_galaxy_member_level.current()
    }

    pub fn minimum_galaxy_member_level_at(&self, block: BlockNumber) -> u64 {
        self.minimum_galaxy_member_level.value_at(block)
    }

    pub fn set_minimum_galaxy_member_level(
        &mut self,
        level: u64,
        block: BlockNumber,
    ) -> Result<(), CheckpointError> {
        self.minimum_galaxy_member_level.push(block, level)
    }

    pub fn enabled_checks(&self) -> CheckSet {
        self.checks.current()
    }

    pub fn enabled_checks_at(&self, block: BlockNumber) -> CheckSet {
        self.checks.value_at(block)
    }

    pub fn is_check_enabled(&self, check: PersonhoodCheck) -> bool {
        self.enabled_checks().contains(check)
    }

    /// Flip one check. Returns whether it is now enabled.
    pub fn toggle_check(
        &mut self,
        check: PersonhoodCheck,
        block: BlockNumber,
    ) -> Result<bool, CheckpointError> {
        let next = self.enabled_checks().toggled(check);
        self.checks.push(block, next)?;
        Ok(next.contains(check))
    }
}
