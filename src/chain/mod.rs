//! Chain parameter registry
//!
//! One [`ChainParams`] value fully describes a network: its consensus rules,
//! wire magic, address prefixes, genesis block, and the release's trusted
//! checkpoint and snapshot tables. The four networks are built by
//! [`main_params`], [`test_params`], [`signet_params`], and
//! [`regtest_params`]; a process that wants a global current network selects
//! one exactly once through [`select`].

mod checkpoints;
mod genesis;
mod networks;
mod overrides;

pub use checkpoints::*;
pub use genesis::{create_genesis_block, GENESIS_MESSAGE};
pub use networks::*;
pub use overrides::*;

use crate::consensus::{Block, ConsensusParams};
use crate::crypto::double_sha256;
use crate::transaction::codec::write_compact_size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The four Ember networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// Proof-of-work plus a block challenge signed by a federation.
    Signet,
    /// Local regression testing.
    Regtest,
}

impl Network {
    /// Canonical lower-case network id.
    pub const fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "signet" => Ok(Network::Signet),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Version bytes for the legacy address and key encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base58Prefixes {
    pub pubkey_address: u8,
    pub script_address: u8,
    pub secret_key: u8,
    pub ext_public_key: [u8; 4],
    pub ext_secret_key: [u8; 4],
}

/// Transaction statistics shipped with the release, used to estimate
/// verification progress during initial sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainTxData {
    /// UNIX timestamp of the block the statistics were sampled at.
    pub time: i64,
    /// Transactions in the chain up to that block.
    pub tx_count: u64,
    /// Estimated transactions per second after that block.
    pub tx_rate: f64,
}

/// Everything a node must know about one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    /// First four bytes of every P2P message on this network.
    pub message_start: [u8; 4],
    pub default_port: u16,
    /// Blocks below this height are never pruned.
    pub prune_after_height: u64,
    /// Rough disk need for a full sync, in GB, for user warnings.
    pub assumed_blockchain_size: u64,
    pub assumed_chain_state_size: u64,
    pub dns_seeds: Vec<String>,
    pub base58_prefixes: Base58Prefixes,
    pub bech32_hrp: String,
    pub genesis: Block,
    pub checkpoints: Checkpoints,
    pub trusted_snapshots: TrustedSnapshots,
    pub chain_tx_data: ChainTxData,
    /// Whether unconfirmed transactions must pass standardness rules.
    pub require_standard: bool,
    /// Whether expensive internal sanity checks default to on.
    pub default_consistency_checks: bool,
    pub is_test_chain: bool,
    /// Whether the network tolerates mocked clocks and manufactured blocks.
    pub is_mockable_chain: bool,
}

impl ChainParams {
    /// Canonical lower-case network id.
    pub fn network_id(&self) -> &'static str {
        self.network.name()
    }
}

/// First four bytes of the double-SHA256 of the length-prefixed challenge
/// script. Distinct challenges yield distinct signets that cannot exchange
/// messages.
pub(crate) fn signet_message_start(challenge: &[u8]) -> [u8; 4] {
    let mut stream = Vec::with_capacity(challenge.len() + 9);
    write_compact_size(&mut stream, challenge.len() as u64);
    stream.extend_from_slice(challenge);
    let hash = double_sha256(&stream);
    let mut magic = [0u8; 4];
    magic.copy_from_slice(&hash.as_bytes()[..4]);
    magic
}

static GLOBAL_CHAIN_PARAMS: OnceLock<ChainParams> = OnceLock::new();

/// Install the process-wide chain parameters. Panics if parameters were
/// already selected: switching networks mid-process is never legitimate.
pub fn select(params: ChainParams) {
    let network = params.network;
    if GLOBAL_CHAIN_PARAMS.set(params).is_err() {
        panic!(
            "chain parameters already selected as {}, refusing to switch to {network}",
            active().network
        );
    }
}

/// The selected chain parameters. Panics if [`select`] has not run.
pub fn active() -> &'static ChainParams {
    GLOBAL_CHAIN_PARAMS
        .get()
        .expect("chain parameters requested before selection")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_network_names_roundtrip() {
        for network in [
            Network::Main,
            Network::Test,
            Network::Signet,
            Network::Regtest,
        ] {
            assert_eq!(network.name().parse::<Network>().unwrap(), network);
            assert_eq!(network.to_string(), network.name());
        }
        assert_eq!(
            "mainnet".parse::<Network>(),
            Err(ConfigError::UnknownNetwork("mainnet".into()))
        );
    }

    #[test]
    fn test_signet_message_start_hashes_length_prefixed_script() {
        let challenge = [0x51u8];
        let digest = double_sha256(&[0x01, 0x51]);
        assert_eq!(signet_message_start(&challenge), digest.as_bytes()[..4]);
    }

    // The selection global is process-wide, so this is the only test in the
    // crate that may touch it.
    #[test]
    fn test_selection_is_once_per_process() {
        select(for_network(Network::Regtest));
        assert_eq!(active().network, Network::Regtest);
        assert_eq!(active().default_port, 18845);

        let second = catch_unwind(AssertUnwindSafe(|| {
            select(for_network(Network::Main));
        }));
        assert!(second.is_err());
        assert_eq!(active().network, Network::Regtest);
    }
}
