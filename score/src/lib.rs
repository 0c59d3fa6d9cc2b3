//! Proof-of-participation (PoP) score ledger.
//!
//! Every action an account performs in a registered application earns points
//! according to the application's security level. Points are bucketed per
//! round and per application and never decremented.
//!
//! The cumulative score is not stored. It is recomputed on demand over a
//! sliding window of rounds, discounting the carried total by the decay rate
//! at every step:
//!
//! `cum(r) = roundScore(r) + floor(cum(r-1) * (100 - decayRate) / 100)`

pub mod decay;
pub mod error;
pub mod ledger;
pub mod params;

pub use decay::cumulative_with_decay;
pub use error::ScoreError;
pub use ledger::ScoreLedger;
pub use params::{ScoreParams, DEFAULT_MULTIPLIERS, MAX_DECAY_RATE};
