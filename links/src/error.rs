use passport_types::{Account, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("cannot link an account to itself")]
    CannotLinkToSelf,

    #[error("cannot delegate an account to itself")]
    CannotDelegateToSelf,

    #[error("{0} already holds a conflicting link or delegation")]
    AlreadyLinked(Account),

    #[error("{0} is a delegator or delegatee and cannot be linked as an entity")]
    DelegatedEntity(Account),

    #[error("entity {0} cannot delegate personhood")]
    PassportDelegationFromEntity(Account),

    #[error("cannot delegate personhood to entity {0}")]
    PassportDelegationToEntity(Account),

    #[error("passport {passport} already has the maximum of {max} entities")]
    MaxEntitiesPerPassportReached { passport: Account, max: u32 },

    #[error("no matching link for {0}")]
    NotLinked(Account),

    #[error("no matching delegation for {0}")]
    NotDelegated(Account),

    #[error("{0} is not a party to this relation")]
    UnauthorizedUser(Account),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signature expired at {deadline} (now {now})")]
    SignatureExpired { deadline: Timestamp, now: Timestamp },

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] passport_checkpoints::CheckpointError),
}
