//! Personhood for voter passports.
//!
//! Composes the score ledger, the moderation lists and the link graph into a
//! single decision: is this account a unique human who may vote?
//!
//! - [`PassportState`] holds everything and implements every operation as a
//!   plain method taking the block number explicitly.
//! - [`PassportService`] is the transactional boundary: role checks, clock,
//!   copy-on-write commits, event queue and snapshots.
//! - [`collaborators`] declares what the passport needs from the chain:
//!   access control, membership tiers, the app registry, voting rounds and a
//!   clock.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod service;
pub mod settings;
pub mod snapshot;
pub mod state;

pub use collaborators::{
    AccessControl, AppRegistry, ChainClock, Collaborators, MembershipTiers, Role, VotingRounds,
};
pub use config::{PassportConfig, SecurityMultipliers};
pub use error::PersonhoodError;
pub use evaluator::PersonhoodReason;
pub use events::{PassportEvent, SettingChange};
pub use service::PassportService;
pub use settings::PersonhoodSettings;
pub use snapshot::{StateSnapshot, SNAPSHOT_SCHEMA_VERSION};
pub use state::PassportState;
