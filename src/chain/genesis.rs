//! Genesis block construction
//!
//! Every network's first block is rebuilt from source at startup and checked
//! against the compiled-in hash, so a corrupted binary cannot silently run on
//! the wrong chain. The coinbase embeds a fixed newspaper-style message and
//! pays the launch reward to a throwaway key.

use crate::consensus::{Block, BlockHeader};
use crate::crypto::Hash256;
use crate::transaction::{Amount, MutableTransaction, OutPoint, OutputTag, Script, TxIn, TxOut};

/// Message embedded in the genesis coinbase input.
pub const GENESIS_MESSAGE: &str = "On January 12, 2026, the genesis block for Ember was created";

/// Uncompressed key the genesis reward is paid to. Nobody holds the private
/// key; the output is unspendable in practice.
const GENESIS_OUTPUT_KEY: [u8; 65] = [
    0x04, 0xa4, 0x8c, 0x3c, 0x03, 0x3b, 0x61, 0xaa, 0x09, 0x3f, 0xbd, 0xbe, 0x31, 0x16, 0x40,
    0x9b, 0x32, 0x55, 0x43, 0xf7, 0x40, 0x75, 0xd0, 0xde, 0x4a, 0x1c, 0xe5, 0xce, 0x83, 0xe0,
    0x09, 0x75, 0x41, 0x11, 0xc3, 0xe9, 0xbb, 0x77, 0x33, 0x66, 0x92, 0x9a, 0xd7, 0x03, 0x11,
    0x97, 0x73, 0x64, 0x50, 0x70, 0xfe, 0xef, 0xf4, 0x75, 0x06, 0x72, 0x2a, 0xf8, 0xd8, 0xa2,
    0xfc, 0x6d, 0xcd, 0x31, 0x57,
];

fn build_genesis(
    script_sig: Script,
    output_script: Script,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Block {
    let mut coinbase = MutableTransaction::new();
    coinbase.version = 1;
    coinbase.inputs.push(TxIn::new(OutPoint::null(), script_sig));
    coinbase.outputs.push(
        TxOut::value(OutputTag::NATIVE, reward, output_script)
            .unwrap_or_else(|_| unreachable!("native tag is a value tag")),
    );
    let txid = coinbase.txid();

    let header = BlockHeader::new(version, Hash256::zero(), txid, time, bits, nonce);
    Block::new(header, vec![coinbase.finalize()])
}

/// Build the genesis block for the given mining parameters.
///
/// The merkle root is recomputed from the coinbase, never stored, so any
/// drift in the transaction codec shows up as a genesis hash mismatch.
pub fn create_genesis_block(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Block {
    let mut script_sig = Script::new();
    script_sig
        .push_num(486604799)
        .push_slice(&[4])
        .push_slice(GENESIS_MESSAGE.as_bytes());

    let mut output_script = Script::new();
    output_script
        .push_slice(&GENESIS_OUTPUT_KEY)
        .push_opcode(crate::transaction::OP_CHECKSIG);

    build_genesis(script_sig, output_script, time, nonce, bits, version, reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COIN, INITIAL_SUBSIDY};

    fn genesis() -> Block {
        create_genesis_block(1768176005, 12618924, 0x1e00ffff, 1, INITIAL_SUBSIDY)
    }

    #[test]
    fn test_genesis_structure() {
        let block = genesis();
        assert!(block.is_genesis());
        assert_eq!(block.transactions.len(), 1);

        let coinbase = &block.transactions[0];
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.version(), 1);
        assert_eq!(coinbase.lock_time(), 0);
        assert_eq!(
            coinbase.value_out(OutputTag::NATIVE).unwrap(),
            2048 * COIN
        );
    }

    #[test]
    fn test_genesis_message_is_embedded() {
        let block = genesis();
        let script_sig = block.transactions[0].inputs()[0].script_sig.as_bytes();
        // 486604799 scriptnum push, then the 0x04 marker push.
        assert_eq!(&script_sig[..7], &[0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04]);
        let message = GENESIS_MESSAGE.as_bytes();
        assert_eq!(script_sig[7] as usize, message.len());
        assert_eq!(&script_sig[8..], message);
    }

    #[test]
    fn test_genesis_merkle_root_commits_to_coinbase() {
        let block = genesis();
        assert_eq!(block.header.merkle_root, block.transactions[0].txid());
        assert_eq!(block.compute_merkle_root(), block.header.merkle_root);
    }

    #[test]
    fn test_nonce_variation_changes_hash() {
        let a = create_genesis_block(1768176002, 0, 0x207fffff, 1, INITIAL_SUBSIDY);
        let b = create_genesis_block(1768176002, 1, 0x207fffff, 1, INITIAL_SUBSIDY);
        assert_ne!(a.hash(), b.hash());
        // Same transactions underneath, so the merkle roots still agree.
        assert_eq!(a.header.merkle_root, b.header.merkle_root);
    }
}
