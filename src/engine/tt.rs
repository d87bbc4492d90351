//! Transposition Table
//!
//! Direct-mapped, fixed-capacity memo of search results. A position's slot
//! is its hash modulo the capacity, and a write always replaces whatever the
//! slot held. Different positions can share a slot, so a probe only returns
//! an entry whose stored key equals the probed hash.

use crate::core::Move;
use tracing::debug;

/// Entry type in the transposition table
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TTFlag {
    /// Exact score
    Exact = 0,
    /// Lower bound (beta cutoff)
    LowerBound = 1,
    /// Upper bound (failed low)
    UpperBound = 2,
}

/// A single entry in the transposition table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    /// Zobrist hash key (for verification)
    pub key: u64,
    /// Best move found, if the node had one
    pub best_move: Option<Move>,
    /// Remaining depth the score was searched to
    pub depth: i32,
    /// Score, mate scores relative to this node
    pub score: i32,
    pub flag: TTFlag,
}

/// Transposition table
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let capacity = ((size_mb.max(1) * 1024 * 1024) / entry_size).max(1);
        debug!(size_mb, capacity, "allocating transposition table");
        Self::with_capacity(capacity)
    }

    /// Create a table holding exactly `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        TranspositionTable {
            entries: vec![None; capacity.max(1)],
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Probe the table. A slot holding another position counts as a miss.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<&TTEntry> {
        self.entries[self.index(key)]
            .as_ref()
            .filter(|entry| entry.key == key)
    }

    /// Store an entry, replacing whatever occupied its slot
    #[inline]
    pub fn store(&mut self, entry: TTEntry) {
        let idx = self.index(entry.key);
        self.entries[idx] = Some(entry);
    }

    /// Clear the table
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Occupied slots per mille, sampled from the first thousand slots
    pub fn hashfull(&self) -> usize {
        let sample_size = 1000.min(self.entries.len());
        let used = self.entries[..sample_size]
            .iter()
            .filter(|e| e.is_some())
            .count();
        (used * 1000) / sample_size
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::default().hash_mb)
    }
}
