use passport_types::BlockNumber;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint at {attempted} precedes latest checkpoint at {latest}")]
    OutOfOrder {
        latest: BlockNumber,
        attempted: BlockNumber,
    },
}
