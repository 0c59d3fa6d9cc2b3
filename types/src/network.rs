//! Network identifier, used to bind signed authorizations to one chain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which chain the passport state belongs to.
///
/// The chain id is part of every typed-data signing domain, so an
/// authorization signed for the test network cannot be replayed on main.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// Local development network.
    #[default]
    Dev,
}

impl NetworkId {
    /// Numeric chain id mixed into signing domains.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Main => 0x4a,
            Self::Test => 0x27,
            Self::Dev => 0x01,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
