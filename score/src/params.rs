//! Scoring parameters: decay, window, and security multipliers.

use crate::error::ScoreError;
use passport_checkpoints::Checkpoints;
use passport_types::{AppId, BlockNumber, SecurityLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound for the decay rate (percent).
pub const MAX_DECAY_RATE: u64 = 100;

/// Default points per action for each security level.
pub const DEFAULT_MULTIPLIERS: [(SecurityLevel, u64); 4] = [
    (SecurityLevel::None, 0),
    (SecurityLevel::Low, 100),
    (SecurityLevel::Medium, 200),
    (SecurityLevel::High, 400),
];

/// Tunable scoring parameters.
///
/// Decay rate and window length are checkpointed so past configurations can be
/// inspected; score computations always use the latest values. Changing a
/// parameter never rewrites recorded round scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreParams {
    decay_rate: Checkpoints<u64>,
    rounds_for_cumulative_score: Checkpoints<u64>,
    multipliers: HashMap<SecurityLevel, u64>,
    app_security: HashMap<AppId, SecurityLevel>,
}

impl ScoreParams {
    pub fn new(
        decay_rate: u64,
        rounds_for_cumulative_score: u64,
        genesis: BlockNumber,
    ) -> Result<Self, ScoreError> {
        validate_decay_rate(decay_rate)?;
        validate_window(rounds_for_cumulative_score)?;
        Ok(Self {
            decay_rate: Checkpoints::starting_at(genesis, decay_rate),
            rounds_for_cumulative_score: Checkpoints::starting_at(
                genesis,
                rounds_for_cumulative_score,
            ),
            multipliers: DEFAULT_MULTIPLIERS.into_iter().collect(),
            app_security: HashMap::new(),
        })
    }

    pub fn decay_rate(&self) -> u64 {
        self.decay_rate.current()
    }

    pub fn decay_rate_at(&self, block: BlockNumber) -> u64 {
        self.decay_rate.value_at(block)
    }

    pub fn set_decay_rate(&mut self, rate: u64, block: BlockNumber) -> Result<(), ScoreError> {
        validate_decay_rate(rate)?;
        self.decay_rate.push(block, rate)?;
        Ok(())
    }

    pub fn rounds_for_cumulative_score(&self) -> u64 {
        self.rounds_for_cumulative_score.current()
    }

    pub fn rounds_for_cumulative_score_at(&self, block: BlockNumber) -> u64 {
        self.rounds_for_cumulative_score.value_at(block)
    }

    pub fn set_rounds_for_cumulative_score(
        &mut self,
        rounds: u64,
        block: BlockNumber,
    ) -> Result<(), ScoreError> {
        validate_window(rounds)?;
        self.rounds_for_cumulative_score.push(block, rounds)?;
        Ok(())
    }

    pub fn security_multiplier(&self, level: SecurityLevel) -> u64 {
        self.multipliers.get(&level).copied().unwrap_or(0)
    }

    pub fn set_security_multiplier(&mut self, level: SecurityLevel, multiplier: u64) {
        self.multipliers.insert(level, multiplier);
    }

    /// Level assigned through [`ScoreParams::set_app_security`], if any.
    pub fn app_security(&self, app: &AppId) -> Option<SecurityLevel> {
        self.app_security.get(app).copied()
    }

    pub fn set_app_security(&mut self, app: AppId, level: SecurityLevel) {
        self.app_security.insert(app, level);
    }
}

fn validate_decay_rate(rate: u64) -> Result<(), ScoreError> {
    if rate > MAX_DECAY_RATE {
        return Err(ScoreError::InvalidDecayRate(rate));
    }
    Ok(())
}

fn validate_window(rounds: u64) -> Result<(), ScoreError> {
    if rounds == 0 {
        return Err(ScoreError::ZeroRoundsWindow);
    }
    Ok(())
}
