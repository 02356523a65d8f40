//! Compiled-in parameter tables for the four Ember networks
//!
//! Each constructor rebuilds its genesis block from source and checks the
//! hash against the value this release was shipped with, so a codec or
//! constant regression aborts immediately instead of producing a node that
//! follows a different chain.

use super::{
    apply_activation_heights, apply_version_bits, create_genesis_block, parse_signet_challenge,
    signet_message_start, Base58Prefixes, ChainParams, ChainTxData, Checkpoints, ConfigError,
    Network, RegtestOptions, SignetOptions, SnapshotEntry, TrustedSnapshots,
};
use crate::consensus::{ConsensusParams, Deployment};
use crate::constants::INITIAL_SUBSIDY;
use crate::crypto::Hash256;
use std::collections::BTreeMap;

/// Default signet challenge: 1-of-2 multisig over the launch federation
/// keys.
const DEFAULT_SIGNET_CHALLENGE: &str = "512103edc36bffccacbeb4084845bc7aa6de16d9ae3e72a16130aba2bbf937c11faf602102c27b9162932de8f04bafebbc1168d103ada6ed526f62863b8bf55972d14cc5eb52ae";

fn hash_literal(hex: &str) -> Hash256 {
    Hash256::from_hex(hex).expect("compiled-in hash literal")
}

fn base58_main() -> Base58Prefixes {
    Base58Prefixes {
        pubkey_address: 0,
        script_address: 5,
        secret_key: 128,
        ext_public_key: [0x04, 0x88, 0xb2, 0x1e],
        ext_secret_key: [0x04, 0x88, 0xad, 0xe4],
    }
}

fn base58_test() -> Base58Prefixes {
    Base58Prefixes {
        pubkey_address: 111,
        script_address: 196,
        secret_key: 239,
        ext_public_key: [0x04, 0x35, 0x87, 0xcf],
        ext_secret_key: [0x04, 0x35, 0x83, 0x94],
    }
}

/// The production network.
pub fn main_params() -> ChainParams {
    let consensus = ConsensusParams {
        genesis_hash: Hash256::zero(),
        subsidy_halving_interval: 262144,
        bip34_height: 0,
        dersig_height: 0,
        cltv_height: 0,
        csv_height: 0,
        segwit_height: 0,
        pow_limit: hash_literal(
            "000000ffff000000000000000000000000000000000000000000000000000000",
        ),
        pow_target_spacing: 120,
        pow_target_timespan: 7 * 24 * 60 * 60,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        rule_change_activation_threshold: 4536, // 90% of 5040
        miner_confirmation_window: 5040,        // pow_target_timespan / pow_target_spacing
        deployments: [
            Deployment::never_active(28),
            // Taproot: March 1st, 2026 through September 1st, 2026.
            Deployment {
                bit: 2,
                start_time: 1772323200,
                timeout: 1788220800,
                min_activation_height: 0,
            },
        ],
        minimum_chain_work: hash_literal(
            "0000000000000000000000000000000000000000000000000000024bd14e1acf",
        ),
        default_assume_valid: hash_literal(
            "000000000053a0658ff09f66c942d359e2d2d80d793392d8869739a07ecf3c38",
        ), // 144000
        signet_blocks: false,
        signet_challenge: Vec::new(),
    };

    //                                 time:       nonce:    bits:
    let genesis = create_genesis_block(1768176005, 12618924, 0x1e00ffff, 1, INITIAL_SUBSIDY);
    let genesis_hash = genesis.hash();
    assert_eq!(
        genesis_hash,
        hash_literal("000000489a1b216e8dc3d23eb7cfdc41da16419639f5e2c7a1d5d36804340496")
    );
    assert_eq!(
        genesis.header.merkle_root,
        hash_literal("2f07ee09338c276d8dfd9c9d470e8f22f95860bc919bd32726ed71983813576f")
    );

    ChainParams {
        network: Network::Main,
        consensus: ConsensusParams {
            genesis_hash,
            ..consensus
        },
        message_start: [0xe2, 0xaf, 0xd1, 0x08],
        default_port: 8844,
        prune_after_height: 100_000,
        assumed_blockchain_size: 1,
        assumed_chain_state_size: 1,
        dns_seeds: vec![
            "seed.ember.network".to_string(),
            "dnsseed.embernodes.io".to_string(),
            "seed.emberbase.org".to_string(),
        ],
        base58_prefixes: base58_main(),
        bech32_hrp: "emb".to_string(),
        genesis,
        checkpoints: Checkpoints::new(BTreeMap::from([(0, genesis_hash)])),
        trusted_snapshots: TrustedSnapshots::default(),
        chain_tx_data: ChainTxData {
            time: 1786233600,
            tx_count: 182079,
            tx_rate: 0.0100832364,
        },
        require_standard: true,
        default_consistency_checks: false,
        is_test_chain: false,
        is_mockable_chain: false,
    }
}

/// The public test network.
pub fn test_params() -> ChainParams {
    let consensus = ConsensusParams {
        genesis_hash: Hash256::zero(),
        subsidy_halving_interval: 262144,
        bip34_height: 0,
        dersig_height: 0,
        cltv_height: 0,
        csv_height: 0,
        segwit_height: 0,
        pow_limit: hash_literal(
            "000000ffff000000000000000000000000000000000000000000000000000000",
        ),
        pow_target_spacing: 120,
        pow_target_timespan: 7 * 24 * 60 * 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        rule_change_activation_threshold: 4536,
        miner_confirmation_window: 5040,
        deployments: [
            Deployment::never_active(28),
            Deployment {
                bit: 2,
                start_time: 1772323200,
                timeout: 1788220800,
                min_activation_height: 0,
            },
        ],
        minimum_chain_work: hash_literal(
            "00000000000000000000000000000000000000000000000000000092f39385f3",
        ),
        default_assume_valid: hash_literal(
            "0000000005ae9ec714e0f95a75b5f171deba088dbee6857ee592aeb382615591",
        ), // 30000
        signet_blocks: false,
        signet_challenge: Vec::new(),
    };

    let genesis = create_genesis_block(1768176011, 12315, 0x1e00ffff, 1, INITIAL_SUBSIDY);
    let genesis_hash = genesis.hash();
    assert_eq!(
        genesis_hash,
        hash_literal("000000f52eacaf55f443d6c341d1c7c9b7bfc69a6412e506417c05689b016bd8")
    );
    assert_eq!(
        genesis.header.merkle_root,
        hash_literal("2f07ee09338c276d8dfd9c9d470e8f22f95860bc919bd32726ed71983813576f")
    );

    ChainParams {
        network: Network::Test,
        consensus: ConsensusParams {
            genesis_hash,
            ..consensus
        },
        message_start: [0x0c, 0x14, 0x0a, 0x09],
        default_port: 18844,
        prune_after_height: 1000,
        assumed_blockchain_size: 1,
        assumed_chain_state_size: 1,
        dns_seeds: vec!["testnet-seed.ember.network".to_string()],
        base58_prefixes: base58_test(),
        bech32_hrp: "embt".to_string(),
        genesis,
        checkpoints: Checkpoints::new(BTreeMap::from([(0, genesis_hash)])),
        trusted_snapshots: TrustedSnapshots::default(),
        chain_tx_data: ChainTxData {
            time: 1786233600,
            tx_count: 19562,
            tx_rate: 0.0010833118,
        },
        require_standard: false,
        default_consistency_checks: false,
        is_test_chain: true,
        is_mockable_chain: false,
    }
}

/// Signet with the given options; the compiled-in federation challenge is
/// used when none is supplied.
pub fn signet_params(options: &SignetOptions) -> Result<ChainParams, ConfigError> {
    Ok(signet_base(
        parse_signet_challenge(options)?,
        options.seeds.clone(),
    ))
}

pub(super) fn signet_base(
    challenge: Option<Vec<u8>>,
    seeds: Option<Vec<String>>,
) -> ChainParams {
    let default_challenge = challenge.is_none();
    let challenge = challenge.unwrap_or_else(|| {
        hex::decode(DEFAULT_SIGNET_CHALLENGE).expect("compiled-in challenge literal")
    });

    // A custom signet is a fresh chain: no work minimum, no vouched blocks,
    // no statistics.
    let (minimum_chain_work, default_assume_valid, chain_tx_data, assumed_blockchain_size) =
        if default_challenge {
            (
                hash_literal("000000000000000000000000000000000000000000000000000000a984fea3fb"),
                hash_literal("000000064dd057c3c6a2e052483f3f89587089a8a7ba0b83159409691cb8c0f2"), // 140000
                ChainTxData {
                    time: 1786233600,
                    tx_count: 10533,
                    tx_rate: 0.0005833004,
                },
                1,
            )
        } else {
            (
                Hash256::zero(),
                Hash256::zero(),
                ChainTxData {
                    time: 0,
                    tx_count: 0,
                    tx_rate: 0.0,
                },
                0,
            )
        };

    let message_start = signet_message_start(&challenge);

    let consensus = ConsensusParams {
        genesis_hash: Hash256::zero(),
        subsidy_halving_interval: 262144,
        bip34_height: 1,
        dersig_height: 1,
        cltv_height: 1,
        csv_height: 1,
        segwit_height: 1,
        pow_limit: hash_literal(
            "00000377ae000000000000000000000000000000000000000000000000000000",
        ),
        pow_target_spacing: 120,
        pow_target_timespan: 7 * 24 * 60 * 60,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        rule_change_activation_threshold: 4536,
        miner_confirmation_window: 5040,
        deployments: [
            Deployment::never_active(28),
            Deployment::always_active(2),
        ],
        minimum_chain_work,
        default_assume_valid,
        signet_blocks: true,
        signet_challenge: challenge,
    };

    let genesis = create_genesis_block(1768176008, 94837, 0x1e0377ae, 1, INITIAL_SUBSIDY);
    let genesis_hash = genesis.hash();
    assert_eq!(
        genesis_hash,
        hash_literal("0000008008acf42f8dd1f9f62cb5cd00aaa6b2332c35efbb54c9c6e9ea95c16d")
    );
    assert_eq!(
        genesis.header.merkle_root,
        hash_literal("2f07ee09338c276d8dfd9c9d470e8f22f95860bc919bd32726ed71983813576f")
    );

    ChainParams {
        network: Network::Signet,
        consensus: ConsensusParams {
            genesis_hash,
            ..consensus
        },
        message_start,
        default_port: 38844,
        prune_after_height: 1000,
        assumed_blockchain_size,
        assumed_chain_state_size: 0,
        dns_seeds: seeds.unwrap_or_else(|| {
            if default_challenge {
                vec!["signet-seed.ember.network".to_string()]
            } else {
                Vec::new()
            }
        }),
        base58_prefixes: base58_test(),
        bech32_hrp: "embt".to_string(),
        genesis,
        checkpoints: Checkpoints::default(),
        trusted_snapshots: TrustedSnapshots::default(),
        chain_tx_data,
        require_standard: true,
        default_consistency_checks: false,
        is_test_chain: true,
        is_mockable_chain: false,
    }
}

/// Regtest with the given overrides applied.
pub fn regtest_params(options: &RegtestOptions) -> Result<ChainParams, ConfigError> {
    let mut params = regtest_base(options.fast_prune);
    apply_activation_heights(&mut params.consensus, &options.activation_heights)?;
    apply_version_bits(&mut params.consensus, &options.version_bits)?;
    Ok(params)
}

pub(super) fn regtest_base(fast_prune: bool) -> ChainParams {
    let consensus = ConsensusParams {
        genesis_hash: Hash256::zero(),
        subsidy_halving_interval: 262144,
        bip34_height: 1,
        dersig_height: 1,
        cltv_height: 1,
        csv_height: 1,
        segwit_height: 0,
        pow_limit: hash_literal(
            "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        ),
        pow_target_spacing: 120,
        pow_target_timespan: 7 * 24 * 60 * 60,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: true,
        rule_change_activation_threshold: 108, // 75% of 144
        miner_confirmation_window: 144,
        deployments: [
            Deployment {
                bit: 28,
                start_time: 0,
                timeout: Deployment::NO_TIMEOUT,
                min_activation_height: 0,
            },
            Deployment::always_active(2),
        ],
        minimum_chain_work: Hash256::zero(),
        default_assume_valid: Hash256::zero(),
        signet_blocks: false,
        signet_challenge: Vec::new(),
    };

    let genesis = create_genesis_block(1768176002, 0, 0x207fffff, 1, INITIAL_SUBSIDY);
    let genesis_hash = genesis.hash();
    assert_eq!(
        genesis_hash,
        hash_literal("536c2110df5e088d28291ee3ebab9fe3b795795c37d2bbed16e3abe3eceb969a")
    );
    assert_eq!(
        genesis.header.merkle_root,
        hash_literal("2f07ee09338c276d8dfd9c9d470e8f22f95860bc919bd32726ed71983813576f")
    );

    ChainParams {
        network: Network::Regtest,
        consensus: ConsensusParams {
            genesis_hash,
            ..consensus
        },
        message_start: [0xdc, 0xfb, 0xa3, 0x0d],
        default_port: 18845,
        prune_after_height: if fast_prune { 100 } else { 1000 },
        assumed_blockchain_size: 0,
        assumed_chain_state_size: 0,
        dns_seeds: vec!["dummySeed.invalid.".to_string()],
        base58_prefixes: base58_test(),
        bech32_hrp: "embrt".to_string(),
        genesis,
        checkpoints: Checkpoints::new(BTreeMap::from([(0, genesis_hash)])),
        trusted_snapshots: TrustedSnapshots::new(vec![
            SnapshotEntry {
                height: 110,
                hash_serialized: hash_literal(
                    "1ebbf5850204c0bdb15bf030f47c7fe91d45c44c712697e4509ba67adb01c618",
                ),
                chain_tx_count: 110,
            },
            SnapshotEntry {
                height: 200,
                hash_serialized: hash_literal(
                    "51c8d11d8b5c1de51543c579736e786aa2736206d1e11e627568029ce092cf62",
                ),
                chain_tx_count: 200,
            },
        ]),
        chain_tx_data: ChainTxData {
            time: 0,
            tx_count: 0,
            tx_rate: 0.0,
        },
        require_standard: true,
        default_consistency_checks: true,
        is_test_chain: true,
        is_mockable_chain: true,
    }
}

/// Parameters for `network` with default options.
pub fn for_network(network: Network) -> ChainParams {
    match network {
        Network::Main => main_params(),
        Network::Test => test_params(),
        Network::Signet => signet_base(None, None),
        Network::Regtest => regtest_base(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::DeploymentId;

    #[test]
    fn test_all_networks_build_and_pass_genesis_checks() {
        for network in [
            Network::Main,
            Network::Test,
            Network::Signet,
            Network::Regtest,
        ] {
            let params = for_network(network);
            assert_eq!(params.network, network);
            assert_eq!(params.consensus.genesis_hash, params.genesis.hash());
            assert!(params.genesis.is_genesis());
            assert!(params.checkpoints.verify(0, &params.consensus.genesis_hash));
            // Signet ships no checkpoints; the others pin their genesis.
            if network == Network::Signet {
                assert!(params.checkpoints.is_empty());
            } else {
                assert_eq!(
                    params.checkpoints.get(0),
                    Some(&params.consensus.genesis_hash)
                );
            }
        }
    }

    #[test]
    fn test_networks_do_not_share_identity() {
        let nets = [
            Network::Main,
            Network::Test,
            Network::Signet,
            Network::Regtest,
        ];
        let params: Vec<ChainParams> = nets.iter().map(|n| for_network(*n)).collect();
        for (i, a) in params.iter().enumerate() {
            for b in params.iter().skip(i + 1) {
                assert_ne!(a.message_start, b.message_start);
                assert_ne!(a.default_port, b.default_port);
                assert_ne!(a.consensus.genesis_hash, b.consensus.genesis_hash);
            }
        }
        // All four genesis blocks share one coinbase, so one merkle root.
        let root = params[0].genesis.header.merkle_root;
        assert!(params.iter().all(|p| p.genesis.header.merkle_root == root));
    }

    #[test]
    fn test_default_signet_magic_and_challenge() {
        let params = for_network(Network::Signet);
        assert!(params.consensus.signet_blocks);
        assert_eq!(params.message_start, [0xb0, 0xb8, 0x4e, 0x8c]);
        // OP_1 push(33) push(33) OP_2 OP_CHECKMULTISIG
        assert_eq!(params.consensus.signet_challenge.len(), 71);
        assert_eq!(params.consensus.signet_challenge[0], 0x51);
        assert_eq!(params.consensus.signet_challenge[70], 0xae);
    }

    #[test]
    fn test_custom_signet_challenge_changes_magic_and_resets_trust() {
        let default = for_network(Network::Signet);
        let custom = signet_params(&SignetOptions {
            challenges: vec!["51".to_string()],
            seeds: None,
        })
        .unwrap();
        assert_ne!(custom.message_start, default.message_start);
        assert_eq!(custom.consensus.signet_challenge, vec![0x51]);
        assert!(custom.consensus.minimum_chain_work.is_zero());
        assert!(custom.consensus.default_assume_valid.is_zero());
        assert_eq!(custom.chain_tx_data.tx_count, 0);
        assert!(custom.dns_seeds.is_empty());
        // Same genesis either way: the challenge is not part of the header.
        assert_eq!(
            custom.consensus.genesis_hash,
            default.consensus.genesis_hash
        );
    }

    #[test]
    fn test_regtest_overrides() {
        let params = regtest_params(&RegtestOptions {
            activation_heights: vec!["segwit@100".to_string()],
            version_bits: vec!["testdummy:100:200:10".to_string()],
            fast_prune: true,
        })
        .unwrap();
        assert_eq!(params.consensus.segwit_height, 100);
        let dummy = &params.consensus[DeploymentId::TestDummy];
        assert_eq!(dummy.start_time, 100);
        assert_eq!(dummy.timeout, 200);
        assert_eq!(dummy.min_activation_height, 10);
        assert_eq!(params.prune_after_height, 100);

        assert!(regtest_params(&RegtestOptions {
            activation_heights: vec!["unknownname@5".to_string()],
            version_bits: Vec::new(),
            fast_prune: false,
        })
        .is_err());
    }

    #[test]
    fn test_deployment_schedules_differ_by_network() {
        let main = main_params();
        assert!(main.consensus[DeploymentId::TestDummy].is_never_active());
        assert_eq!(main.consensus[DeploymentId::Taproot].start_time, 1772323200);
        assert_eq!(main.consensus[DeploymentId::Taproot].timeout, 1788220800);

        for network in [Network::Signet, Network::Regtest] {
            let params = for_network(network);
            assert!(params.consensus[DeploymentId::Taproot].is_always_active());
        }

        // Regtest signals the dummy deployment from genesis so functional
        // tests can drive the state machine.
        let regtest = for_network(Network::Regtest);
        assert_eq!(regtest.consensus[DeploymentId::TestDummy].start_time, 0);
        assert!(!regtest.consensus[DeploymentId::TestDummy].is_never_active());
    }
}
