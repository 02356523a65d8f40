//! Checkpoint and trusted snapshot tables
//!
//! Both tables pin hard-coded hashes at fixed heights. Checkpoints reject
//! forks that rewrite ancient history; snapshot entries let a node bootstrap
//! from a serialized UTXO set whose hash the release vouches for. Loading or
//! validating against either table happens elsewhere.

use crate::crypto::Hash256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block hashes that must appear at the given heights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoints {
    entries: BTreeMap<u32, Hash256>,
}

impl Checkpoints {
    pub fn new(entries: BTreeMap<u32, Hash256>) -> Self {
        Self { entries }
    }

    /// The pinned hash at `height`, if any.
    pub fn get(&self, height: u32) -> Option<&Hash256> {
        self.entries.get(&height)
    }

    /// Whether `hash` is acceptable at `height`. Heights without a pin
    /// accept anything.
    pub fn verify(&self, height: u32, hash: &Hash256) -> bool {
        match self.entries.get(&height) {
            Some(pinned) => pinned == hash,
            None => true,
        }
    }

    /// Highest checkpointed height.
    pub fn last_height(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &Hash256)> {
        self.entries.iter()
    }
}

/// One release-vouched UTXO snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Height of the base block the snapshot was taken at.
    pub height: u32,
    /// Hash of the serialized UTXO set.
    pub hash_serialized: Hash256,
    /// Total transactions in the chain up to and including the base block.
    pub chain_tx_count: u64,
}

/// Snapshot entries a release will accept, keyed by base height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedSnapshots {
    entries: BTreeMap<u32, SnapshotEntry>,
}

impl TrustedSnapshots {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.height, e)).collect(),
        }
    }

    /// The vouched entry based at `height`, if any.
    pub fn get(&self, height: u32) -> Option<&SnapshotEntry> {
        self.entries.get(&height)
    }

    /// Whether a snapshot claiming this serialized hash at this height is
    /// one the release vouches for.
    pub fn is_trusted(&self, height: u32, hash_serialized: &Hash256) -> bool {
        self.entries
            .get(&height)
            .is_some_and(|entry| entry.hash_serialized == *hash_serialized)
    }

    pub fn heights(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
