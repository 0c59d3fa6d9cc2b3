//! Account identifier with `pass_` prefix.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account taking part in the passport graph.
///
/// Nothing in the type says whether the account is a passport, an entity, a
/// delegator or a delegatee: the role is derived from the relations it holds.
/// Accounts backed by a key are derived from the Ed25519 public key (see
/// `passport_crypto::derive_account`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account(String);

impl Account {
    /// The standard prefix for all accounts.
    pub const PREFIX: &'static str = "pass_";

    /// Create an account from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `pass_`. Use [`Account::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "account must start with pass_");
        Self(s)
    }

    /// Parse an account from untrusted input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if raw.starts_with(Self::PREFIX) && raw.len() > Self::PREFIX.len() {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAccount(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Account {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
