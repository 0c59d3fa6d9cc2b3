//! Errors raised while constructing shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("unknown personhood check: {0}")]
    UnknownCheck(String),

    #[error("unknown security level: {0}")]
    UnknownSecurityLevel(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} key bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },
}
