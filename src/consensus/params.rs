//! Consensus parameters
//!
//! The per-network constants every validating node must agree on: proof of
//! work bounds, subsidy schedule, buried activation heights, and the
//! version-bits deployment table. A [`ConsensusParams`] value is built once
//! by the chain registry and never mutated afterwards.

use crate::crypto::Hash256;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Version-bits deployments known to this release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentId {
    /// Reserved test deployment, never active outside regression tests.
    TestDummy,
    /// Schnorr/taproot spending rules.
    Taproot,
}

impl DeploymentId {
    pub const COUNT: usize = 2;

    /// Every deployment, in table order.
    pub const fn all() -> [DeploymentId; Self::COUNT] {
        [DeploymentId::TestDummy, DeploymentId::Taproot]
    }

    /// Lower-case name used in configuration directives.
    pub const fn name(self) -> &'static str {
        match self {
            DeploymentId::TestDummy => "testdummy",
            DeploymentId::Taproot => "taproot",
        }
    }

    /// Inverse of [`DeploymentId::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|id| id.name() == name)
    }
}

/// Activation schedule for one version-bits deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Version bit the miners signal on.
    pub bit: u8,
    /// Median-time-past threshold from which signalling counts, or a sentinel.
    pub start_time: i64,
    /// Median-time-past threshold at which the deployment expires.
    pub timeout: i64,
    /// Earliest height the deployment may activate at once locked in.
    pub min_activation_height: i32,
}

impl Deployment {
    /// Start sentinel: the deployment never activates.
    pub const NEVER_ACTIVE: i64 = -2;
    /// Start sentinel: the deployment is active from genesis.
    pub const ALWAYS_ACTIVE: i64 = -1;
    /// Timeout sentinel: signalling never expires.
    pub const NO_TIMEOUT: i64 = i64::MAX;

    /// Schedule that is active from genesis.
    pub const fn always_active(bit: u8) -> Self {
        Deployment {
            bit,
            start_time: Self::ALWAYS_ACTIVE,
            timeout: Self::NO_TIMEOUT,
            min_activation_height: 0,
        }
    }

    /// Schedule that can never activate.
    pub const fn never_active(bit: u8) -> Self {
        Deployment {
            bit,
            start_time: Self::NEVER_ACTIVE,
            timeout: Self::NO_TIMEOUT,
            min_activation_height: 0,
        }
    }

    pub const fn is_always_active(&self) -> bool {
        self.start_time == Self::ALWAYS_ACTIVE
    }

    pub const fn is_never_active(&self) -> bool {
        self.start_time == Self::NEVER_ACTIVE
    }
}

/// Consensus rules for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Hash of the network's genesis block.
    pub genesis_hash: Hash256,
    /// Blocks between subsidy halvings.
    pub subsidy_halving_interval: i32,
    /// Height from which coinbase transactions must commit the block height.
    pub bip34_height: i32,
    /// Height from which strict DER signatures are required.
    pub dersig_height: i32,
    /// Height from which OP_CHECKLOCKTIMEVERIFY is enforced.
    pub cltv_height: i32,
    /// Height from which BIP68/112/113 relative locktimes are enforced.
    pub csv_height: i32,
    /// Height from which segregated witness rules apply.
    pub segwit_height: i32,
    /// Highest admissible proof of work target, as a 256-bit number.
    pub pow_limit: Hash256,
    /// Target seconds between blocks.
    pub pow_target_spacing: i64,
    /// Seconds per difficulty adjustment period.
    pub pow_target_timespan: i64,
    /// Whether stalled test networks may mine at the minimum difficulty.
    pub pow_allow_min_difficulty_blocks: bool,
    /// Whether the difficulty is pinned to the genesis target.
    pub pow_no_retargeting: bool,
    /// Signalling blocks required within one window to lock a deployment in.
    pub rule_change_activation_threshold: u32,
    /// Version-bits signalling window, in blocks.
    pub miner_confirmation_window: u32,
    /// Version-bits deployment table, indexed by [`DeploymentId`].
    pub deployments: [Deployment; DeploymentId::COUNT],
    /// Accumulated work the active chain must exceed before leaving IBD.
    pub minimum_chain_work: Hash256,
    /// Block presumed valid along with its ancestry; zero disables.
    pub default_assume_valid: Hash256,
    /// Whether blocks must carry a signet challenge solution.
    pub signet_blocks: bool,
    /// Script the signet block solutions are checked against.
    pub signet_challenge: Vec<u8>,
}

impl ConsensusParams {
    /// Blocks per retarget period.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }
}

impl Index<DeploymentId> for ConsensusParams {
    type Output = Deployment;

    fn index(&self, id: DeploymentId) -> &Deployment {
        &self.deployments[id as usize]
    }
}

impl IndexMut<DeploymentId> for ConsensusParams {
    fn index_mut(&mut self, id: DeploymentId) -> &mut Deployment {
        &mut self.deployments[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_names_roundtrip() {
        for id in DeploymentId::all() {
            assert_eq!(DeploymentId::from_name(id.name()), Some(id));
        }
        assert_eq!(DeploymentId::from_name("unknownname"), None);
        assert_eq!(DeploymentId::from_name("Taproot"), None);
    }

    #[test]
    fn test_sentinel_constructors() {
        let d = Deployment::always_active(2);
        assert!(d.is_always_active());
        assert!(!d.is_never_active());
        assert_eq!(d.timeout, Deployment::NO_TIMEOUT);

        let d = Deployment::never_active(28);
        assert!(d.is_never_active());
        assert!(!d.is_always_active());
    }

    #[test]
    fn test_deployment_table_indexing() {
        let mut params = crate::chain::main_params().consensus;
        assert_eq!(params[DeploymentId::TestDummy].bit, 28);
        assert_eq!(params[DeploymentId::Taproot].bit, 2);

        params[DeploymentId::Taproot].min_activation_height = 99;
        assert_eq!(params[DeploymentId::Taproot].min_activation_height, 99);
    }
}
