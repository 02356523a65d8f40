//! Double-SHA256 hashing
//!
//! Every consensus identity in Ember (transaction ids, block hashes, the
//! Merkle root) is a SHA-256 digest applied twice.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// 32-byte double-SHA256 digest.
///
/// Hex strings use the conventional reversed byte order: the string is the
/// digest read as a 256-bit little-endian integer, which is how block and
/// transaction hashes circulate outside the wire encoding. The same storage
/// also carries other 256-bit consensus quantities (proof-of-work targets,
/// accumulated chain work) parsed from the same hex convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The all-zero digest (null previous-block reference, empty Merkle root).
    pub const fn zero() -> Self {
        Hash256([0u8; 32])
    }

    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }

    /// Parse from reversed-order hex.
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        for (i, b) in bytes.iter().rev().enumerate() {
            arr[i] = *b;
        }
        Ok(Hash256(arr))
    }

    /// Format as reversed-order hex.
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Raw digest bytes, wire order.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Hash256 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Double SHA-256 of arbitrary bytes.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&second);
    Hash256(arr)
}

/// Double SHA-256 of two digests concatenated (Merkle inner node).
pub fn hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(&left.0);
    data[32..].copy_from_slice(&right.0);
    double_sha256(&data)
}
