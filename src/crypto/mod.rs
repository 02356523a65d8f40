//! Cryptography module - double-SHA256 digests and Merkle roots

mod hash;
mod merkle;

pub use hash::*;
pub use merkle::*;
