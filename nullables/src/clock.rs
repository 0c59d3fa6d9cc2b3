//! Nullable clock: deterministic block height and time for testing.

use passport_personhood::ChainClock;
use passport_types::{BlockNumber, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic chain clock.
///
/// Blocks and time only advance when you tell them to.
#[derive(Debug, Default)]
pub struct NullClock {
    block: AtomicU64,
    secs: AtomicU64,
}

impl NullClock {
    pub fn new(block: u64, secs: u64) -> Self {
        Self {
            block: AtomicU64::new(block),
            secs: AtomicU64::new(secs),
        }
    }

    /// Advance the block height by `blocks`.
    pub fn advance_blocks(&self, blocks: u64) -> BlockNumber {
        BlockNumber(self.block.fetch_add(blocks, Ordering::SeqCst) + blocks)
    }

    /// Advance wall-clock time by `secs`.
    pub fn advance_secs(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set_block(&self, block: u64) {
        self.block.store(block, Ordering::SeqCst);
    }

    pub fn set_time(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl ChainClock for NullClock {
    fn block_number(&self) -> BlockNumber {
        BlockNumber(self.block.load(Ordering::SeqCst))
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }
}
