//! Application security levels.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much an application is trusted to report genuine participation.
///
/// Each level maps to a point multiplier held by the score ledger; a level is
/// only a key, the multiplier itself is configurable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SecurityLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypesError::UnknownSecurityLevel(s.to_string()))
    }
}
