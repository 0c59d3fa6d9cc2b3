//! Nullable voting rounds.

use parking_lot::RwLock;
use passport_checkpoints::Checkpoints;
use passport_personhood::VotingRounds;
use passport_types::{BlockNumber, Round};

/// Rounds started by hand at chosen blocks.
#[derive(Debug, Default)]
pub struct NullRounds {
    started: RwLock<Checkpoints<Round>>,
}

impl NullRounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `round` at `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is before the previous round's start.
    pub fn start_round(&self, round: Round, block: BlockNumber) {
        self.started
            .write()
            .push(block, round)
            .expect("rounds must start in block order");
    }
}

impl VotingRounds for NullRounds {
    fn current_round(&self) -> Round {
        self.started.read().current()
    }

    fn round_at(&self, block: BlockNumber) -> Round {
        self.started.read().value_at(block)
    }
}
