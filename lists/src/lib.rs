//! Moderation lists for passports.
//!
//! An account can be whitelisted or blacklisted (never both) and signaled
//! any number of times. Status propagates along active links: every passport
//! keeps aggregate counters of its listed entities and of the signals its
//! entities received. A passport with entities is considered listed when the
//! listed share of its entities reaches the configured percentage; a passport
//! without entities falls back to its own direct listing.
//!
//! List membership and thresholds are live. Only the entity set can be read
//! as of a past block, through the link graph's checkpoints.

pub mod error;
pub mod manager;
pub mod signals;

pub use error::ListError;
pub use manager::{ListKind, ListManager, DEFAULT_LIST_THRESHOLD, DEFAULT_SIGNALING_THRESHOLD};
pub use signals::SignalOutcome;
