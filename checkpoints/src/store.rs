//! One checkpoint trace per subject.

use crate::error::CheckpointError;
use crate::trace::Checkpoints;
use passport_types::BlockNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Keyed collection of [`Checkpoints`].
///
/// Subjects that were never written read as `T::default()` at every block.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Eq + Hash, T: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, T: Deserialize<'de>"
))]
pub struct CheckpointStore<K, T> {
    traces: HashMap<K, Checkpoints<T>>,
}

impl<K, T> Default for CheckpointStore<K, T> {
    fn default() -> Self {
        Self {
            traces: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, T: Clone + Default> CheckpointStore<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: &K, block: BlockNumber, value: T) -> Result<(), CheckpointError> {
        self.traces
            .entry(subject.clone())
            .or_default()
            .push(block, value)
    }

    pub fn value_at(&self, subject: &K, block: BlockNumber) -> T {
        self.traces
            .get(subject)
            .map(|trace| trace.value_at(block))
            .unwrap_or_default()
    }

    pub fn current(&self, subject: &K) -> T {
        self.traces
            .get(subject)
            .map(Checkpoints::current)
            .unwrap_or_default()
    }

    pub fn trace(&self, subject: &K) -> Option<&Checkpoints<T>> {
        self.traces.get(subject)
    }

    /// Subjects with at least one recorded checkpoint.
    pub fn subjects(&self) -> impl Iterator<Item = &K> {
        self.traces.keys()
    }
}
