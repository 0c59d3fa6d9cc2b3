//! Personhood checks and the bitmask of enabled checks.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently toggleable input to the personhood decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonhoodCheck {
    Whitelist,
    Blacklist,
    Signaling,
    ParticipationScore,
    GalaxyMember,
}

impl PersonhoodCheck {
    pub const ALL: [PersonhoodCheck; 5] = [
        Self::Whitelist,
        Self::Blacklist,
        Self::Signaling,
        Self::ParticipationScore,
        Self::GalaxyMember,
    ];

    fn bit(self) -> u8 {
        match self {
            Self::Whitelist => 1 << 0,
            Self::Blacklist => 1 << 1,
            Self::Signaling => 1 << 2,
            Self::ParticipationScore => 1 << 3,
            Self::GalaxyMember => 1 << 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whitelist => "whitelist",
            Self::Blacklist => "blacklist",
            Self::Signaling => "signaling",
            Self::ParticipationScore => "participation_score",
            Self::GalaxyMember => "galaxy_member",
        }
    }
}

impl fmt::Display for PersonhoodCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonhoodCheck {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|check| check.as_str() == s)
            .ok_or_else(|| TypesError::UnknownCheck(s.to_string()))
    }
}

/// Bitmask of enabled [`PersonhoodCheck`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckSet(u8);

impl CheckSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        PersonhoodCheck::ALL.into_iter().collect()
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::all().0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, check: PersonhoodCheck) -> bool {
        self.0 & check.bit() != 0
    }

    pub fn with(self, check: PersonhoodCheck) -> Self {
        Self(self.0 | check.bit())
    }

    pub fn without(self, check: PersonhoodCheck) -> Self {
        Self(self.0 & !check.bit())
    }

    /// Flip a single check.
    pub fn toggled(self, check: PersonhoodCheck) -> Self {
        Self(self.0 ^ check.bit())
    }

    pub fn iter(&self) -> impl Iterator<Item = PersonhoodCheck> + '_ {
        PersonhoodCheck::ALL
            .into_iter()
            .filter(move |check| self.contains(*check))
    }
}

impl FromIterator<PersonhoodCheck> for CheckSet {
    fn from_iter<I: IntoIterator<Item = PersonhoodCheck>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), CheckSet::with)
    }
}
