//! Block structure for the Ember blockchain
//!
//! Defines the immutable block and its 80-byte header. The header commits to
//! the transaction set through the merkle root and is the unit the proof of
//! work grinds over.

use crate::crypto::{compute_merkle_root, double_sha256, Hash256};
use crate::transaction::codec::{decode_tx, write_compact_size, SliceReader};
use crate::transaction::{DecodeError, Transaction};
use serde::{Deserialize, Serialize};

/// Canonical header size on the wire.
pub const HEADER_SIZE: usize = 80;

/// Block header containing all metadata
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version
    pub version: i32,
    /// Hash of the previous block header
    pub prev_hash: Hash256,
    /// Merkle root of all transaction ids
    pub merkle_root: Hash256,
    /// Block timestamp (seconds since Unix epoch)
    pub time: u32,
    /// Difficulty target (compact representation)
    pub bits: u32,
    /// Nonce used for PoW
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a new block header
    pub fn new(
        version: i32,
        prev_hash: Hash256,
        merkle_root: Hash256,
        time: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            prev_hash,
            merkle_root,
            time,
            bits,
            nonce,
        }
    }

    /// Serialize the header into its canonical 80 bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(self.prev_hash.as_bytes());
        bytes.extend_from_slice(self.merkle_root.as_bytes());
        bytes.extend_from_slice(&self.time.to_le_bytes());
        bytes.extend_from_slice(&self.bits.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    pub(crate) fn read_from(r: &mut SliceReader) -> Result<Self, DecodeError> {
        Ok(Self {
            version: r.read_i32_le()?,
            prev_hash: r.read_hash()?,
            merkle_root: r.read_hash()?,
            time: r.read_u32_le()?,
            bits: r.read_u32_le()?,
            nonce: r.read_u32_le()?,
        })
    }

    /// Decode a header from exactly its canonical bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = SliceReader::new(bytes);
        let header = Self::read_from(&mut r)?;
        if !r.is_empty() {
            return Err(DecodeError::TrailingBytes(r.remaining()));
        }
        Ok(header)
    }

    /// Calculate the hash of this header
    pub fn hash(&self) -> Hash256 {
        double_sha256(&self.to_bytes())
    }
}

/// A complete block containing header and transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header
    pub header: BlockHeader,
    /// List of transactions in this block
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block
    pub fn new(header: BlockHeader, transactions: Vec<Transaction>) -> Self {
        Self {
            header,
            transactions,
        }
    }

    /// Get the block hash
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    /// Merkle root over the legacy transaction ids, in block order
    pub fn compute_merkle_root(&self) -> Hash256 {
        let ids: Vec<Hash256> = self.transactions.iter().map(|tx| tx.txid()).collect();
        compute_merkle_root(&ids)
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.header.prev_hash.is_zero()
    }

    /// Serialize header plus transactions in canonical order
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header.to_bytes();
        write_compact_size(&mut bytes, self.transactions.len() as u64);
        for tx in &self.transactions {
            bytes.extend_from_slice(&tx.encode_full());
        }
        bytes
    }

    /// Decode exactly one block; trailing bytes are an error
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = SliceReader::new(bytes);
        let header = BlockHeader::read_from(&mut r)?;
        let count = r.read_compact_size()?;
        let mut transactions = Vec::new();
        for _ in 0..count {
            transactions.push(decode_tx(&mut r)?.finalize());
        }
        if !r.is_empty() {
            return Err(DecodeError::TrailingBytes(r.remaining()));
        }
        Ok(Self {
            header,
            transactions,
        })
    }
}
