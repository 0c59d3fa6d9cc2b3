use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("decay rate {0} exceeds 100 percent")]
    InvalidDecayRate(u64),

    #[error("rounds for cumulative score must be at least 1")]
    ZeroRoundsWindow,

    #[error("score overflow for {0}")]
    Overflow(String),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] passport_checkpoints::CheckpointError),
}
