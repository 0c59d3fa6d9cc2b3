//! Nullable collaborators for deterministic testing.
//!
//! Every chain-facing dependency of the passport service is a trait in
//! `passport_personhood::collaborators`. This crate provides in-memory
//! implementations that:
//! - return deterministic values
//! - can be controlled programmatically
//! - never touch the network or a real chain
//!
//! [`NullEnvironment`] bundles one of each and hands them to the service as
//! [`Collaborators`], keeping its own handles so a test can drive them.

pub mod access;
pub mod apps;
pub mod clock;
pub mod membership;
pub mod rounds;

pub use access::NullAccessControl;
pub use apps::NullAppRegistry;
pub use clock::NullClock;
pub use membership::NullMembership;
pub use rounds::NullRounds;

use passport_personhood::Collaborators;
use std::sync::Arc;

/// One of each nullable, shared with the service under test.
#[derive(Clone, Default)]
pub struct NullEnvironment {
    pub clock: Arc<NullClock>,
    pub access: Arc<NullAccessControl>,
    pub tiers: Arc<NullMembership>,
    pub apps: Arc<NullAppRegistry>,
    pub rounds: Arc<NullRounds>,
}

impl NullEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            access: self.access.clone(),
            tiers: self.tiers.clone(),
            apps: self.apps.clone(),
            rounds: self.rounds.clone(),
            clock: self.clock.clone(),
        }
    }
}
