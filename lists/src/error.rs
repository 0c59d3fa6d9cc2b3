use passport_types::Account;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("threshold percentage {0} is above 100")]
    InvalidThreshold(u8),

    #[error("{0} is not assigned as an app signaler")]
    NotAppSignaler(Account),
}
