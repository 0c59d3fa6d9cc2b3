//! Checkpointed history: "what was the value as of block N?"
//!
//! A [`Checkpoints`] trace records `(block, value)` pairs in block order.
//! Writes only ever go to the end (a write in the same block as the last entry
//! replaces it), so history that has been committed never changes and a
//! lookup is a binary search over an immutable prefix.
//!
//! [`CheckpointStore`] keys one trace per subject. Thresholds, check flags,
//! link state and delegation state all use the same two types.

pub mod error;
pub mod store;
pub mod trace;

pub use error::CheckpointError;
pub use store::CheckpointStore;
pub use trace::{Checkpoint, Checkpoints};
