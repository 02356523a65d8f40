//! Ember (EMB) Blockchain Core Library
//!
//! Consensus primitives for the Ember proof-of-work chain: the canonical
//! transaction and block codecs, the dual-purpose tagged output model that
//! carries the pegged asset and federation data alongside the native coin,
//! and the compiled-in parameter tables for the four networks.
//!
//! EMB is the short form used in tickers, addresses, and protocol identifiers.

pub mod address;
pub mod chain;
pub mod consensus;
pub mod crypto;
pub mod transaction;

/// Protocol constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    use crate::transaction::Amount;

    /// Base units per EMB (8 decimal places)
    pub const COIN: Amount = 100_000_000;

    /// Number of decimal places
    pub const DECIMAL_PLACES: u8 = 8;

    /// Hard cap on any amount or sum of amounts (in base units): 2^30 EMB
    pub const MAX_MONEY: Amount = 1_073_741_824 * COIN;

    /// Block subsidy at launch (in base units)
    pub const INITIAL_SUBSIDY: Amount = 2048 * COIN;

    /// Chain name (short form for tickers and protocol identifiers)
    pub const CHAIN_NAME: &str = "EMB";

    /// Full chain name
    pub const CHAIN_FULL_NAME: &str = "Ember";
}
