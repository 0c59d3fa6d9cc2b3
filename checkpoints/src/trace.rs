//! A single checkpointed value.

use crate::error::CheckpointError;
use passport_types::BlockNumber;
use serde::{Deserialize, Serialize};

/// A value recorded at a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    pub block: BlockNumber,
    pub value: T,
}

/// Ordered, append-only history of one value.
///
/// Invariant: `entries` is strictly increasing by block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoints<T> {
    entries: Vec<Checkpoint<T>>,
}

impl<T> Default for Checkpoints<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Clone + Default> Checkpoints<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trace holding a single initial value.
    pub fn starting_at(block: BlockNumber, value: T) -> Self {
        Self {
            entries: vec![Checkpoint { block, value }],
        }
    }

    /// Record `value` as of `block`.
    ///
    /// Appends when `block` is after the latest entry and overwrites the
    /// latest entry when it is the same block. Earlier blocks are rejected.
    pub fn push(&mut self, block: BlockNumber, value: T) -> Result<(), CheckpointError> {
        match self.entries.last_mut() {
            Some(last) if block < last.block => Err(CheckpointError::OutOfOrder {
                latest: last.block,
                attempted: block,
            }),
            Some(last) if block == last.block => {
                last.value = value;
                Ok(())
            }
            _ => {
                self.entries.push(Checkpoint { block, value });
                Ok(())
            }
        }
    }

    /// The value as of `block`: the latest entry at or before it, or
    /// `T::default()` when `block` predates the whole history.
    pub fn value_at(&self, block: BlockNumber) -> T {
        let idx = self.entries.partition_point(|c| c.block <= block);
        if idx == 0 {
            T::default()
        } else {
            self.entries[idx - 1].value.clone()
        }
    }

    /// The most recent value, or `T::default()` if nothing was recorded.
    pub fn current(&self) -> T {
        self.latest().map(|c| c.value.clone()).unwrap_or_default()
    }

    pub fn latest(&self) -> Option<&Checkpoint<T>> {
        self.entries.last()
    }

    pub fn latest_block(&self) -> Option<BlockNumber> {
        self.entries.last().map(|c| c.block)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint<T>> {
        self.entries.iter()
    }
}
