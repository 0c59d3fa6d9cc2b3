use crate::collaborators::Role;
use passport_types::Account;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonhoodError {
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] passport_checkpoints::CheckpointError),

    #[error("score error: {0}")]
    Score(#[from] passport_score::ScoreError),

    #[error("link error: {0}")]
    Link(#[from] passport_links::LinkError),

    #[error("list error: {0}")]
    List(#[from] passport_lists::ListError),

    #[error("{account} is missing role {role}")]
    MissingRole { account: Account, role: Role },

    #[error("logging error: {0}")]
    Logging(#[from] passport_utils::LoggingError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
