//! Transaction structures
//!
//! A transaction is built incrementally as a [`MutableTransaction`], then
//! finalized into an immutable [`Transaction`]. Finalizing computes both ids
//! (the legacy id over the witness-free encoding, the witness id over the
//! full encoding) once and caches them for the transaction's whole life.

use crate::crypto::{double_sha256, Hash256};
use crate::transaction::{money_range, Amount, OutputError, OutputKind, OutputTag, Script, TxOut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence value signalling no relative timelock and no replacement.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Version given to newly built transactions.
pub const CURRENT_VERSION: i32 = 2;

/// Reference to a previous transaction's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Id of the transaction holding the output.
    pub txid: Hash256,
    /// Index of the output within that transaction.
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Hash256, vout: u32) -> Self {
        OutPoint { txid, vout }
    }

    /// The null reference marking a coinbase input.
    pub fn null() -> Self {
        OutPoint {
            txid: Hash256::zero(),
            vout: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid.is_zero() && self.vout == u32::MAX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// Witness stack attached to one input, serialized only in the full form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Witness(Vec<Vec<u8>>);

impl Witness {
    pub fn new() -> Self {
        Witness(Vec::new())
    }

    pub fn from_items(items: Vec<Vec<u8>>) -> Self {
        Witness(items)
    }

    pub fn push(&mut self, item: Vec<u8>) {
        self.0.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn items(&self) -> &[Vec<u8>] {
        &self.0
    }
}

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Outpoint being spent, held by value.
    pub previous_output: OutPoint,
    /// Unlocking script.
    pub script_sig: Script,
    /// Relative-timelock / replacement signalling field.
    pub sequence: u32,
    /// Witness stack; empty when the input carries none.
    pub witness: Witness,
}

impl TxIn {
    pub fn new(previous_output: OutPoint, script_sig: Script) -> Self {
        TxIn {
            previous_output,
            script_sig,
            sequence: SEQUENCE_FINAL,
            witness: Witness::new(),
        }
    }
}

/// Editable pre-finalization transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutableTransaction {
    pub version: i32,
    pub lock_time: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
}

impl Default for MutableTransaction {
    fn default() -> Self {
        Self::new()
    }
}

impl MutableTransaction {
    pub fn new() -> Self {
        MutableTransaction {
            version: CURRENT_VERSION,
            lock_time: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Legacy id of the transaction in its current state.
    pub fn txid(&self) -> Hash256 {
        double_sha256(&self.encode_legacy())
    }

    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// One-way transition into the immutable form, computing both ids.
    pub fn finalize(self) -> Transaction {
        Transaction::from(self)
    }
}

/// Finalized transaction. Fields never change after construction, so the
/// cached ids stay valid and the value is safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MutableTransaction", into = "MutableTransaction")]
pub struct Transaction {
    version: i32,
    lock_time: u32,
    inputs: Vec<TxIn>,
    outputs: Vec<TxOut>,
    txid: Hash256,
    wtxid: Hash256,
}

impl Transaction {
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Legacy id: double hash of the witness-free encoding.
    pub fn txid(&self) -> Hash256 {
        self.txid
    }

    /// Witness id: double hash of the full encoding. Equal to [`txid`]
    /// exactly when no input carries a witness.
    ///
    /// [`txid`]: Transaction::txid
    pub fn wtxid(&self) -> Hash256 {
        self.wtxid
    }

    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// Whether this is the block-subsidy transaction: a single input with
    /// the null outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Serialized size of the full encoding in bytes.
    pub fn total_size(&self) -> usize {
        self.encode_full().len()
    }

    /// Sum of all outputs carrying the given value tag.
    ///
    /// Fails with a tag mismatch when `tag` marks the data category, and
    /// with a range error when any amount or the running total leaves the
    /// monetary range.
    pub fn value_out(&self, tag: OutputTag) -> Result<Amount, OutputError> {
        if tag.is_data() {
            return Err(OutputError::TagMismatch {
                tag,
                requested: OutputKind::Value,
            });
        }
        let mut total: Amount = 0;
        for output in &self.outputs {
            if output.tag() != tag {
                continue;
            }
            let view = output.as_value()?;
            if !money_range(view.value) {
                return Err(OutputError::MoneyRange);
            }
            total = total
                .checked_add(view.value)
                .ok_or(OutputError::MoneyRange)?;
            if !money_range(total) {
                return Err(OutputError::MoneyRange);
            }
        }
        Ok(total)
    }
}

impl From<MutableTransaction> for Transaction {
    fn from(tx: MutableTransaction) -> Self {
        let txid = tx.txid();
        let wtxid = if tx.has_witness() {
            double_sha256(&tx.encode_full())
        } else {
            txid
        };
        Transaction {
            version: tx.version,
            lock_time: tx.lock_time,
            inputs: tx.inputs,
            outputs: tx.outputs,
            txid,
            wtxid,
        }
    }
}

impl From<Transaction> for MutableTransaction {
    fn from(tx: Transaction) -> Self {
        MutableTransaction {
            version: tx.version,
            lock_time: tx.lock_time,
            inputs: tx.inputs,
            outputs: tx.outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::OutputTag;

    fn sample_value_out(value: Amount) -> TxOut {
        let mut script = Script::new();
        script.push_slice(&[0x55; 20]);
        TxOut::value(OutputTag::NATIVE, value, script).unwrap()
    }

    fn sample_tx() -> MutableTransaction {
        let mut tx = MutableTransaction::new();
        tx.inputs.push(TxIn::new(OutPoint::null(), Script::new()));
        tx.outputs.push(sample_value_out(1_000));
        tx
    }

    #[test]
    fn test_null_outpoint() {
        assert!(OutPoint::null().is_null());
        assert!(!OutPoint::new(double_sha256(b"tx"), 0).is_null());
        assert!(!OutPoint::new(Hash256::zero(), 0).is_null());
    }

    #[test]
    fn test_coinbase_detection() {
        let coinbase = sample_tx().finalize();
        assert!(coinbase.is_coinbase());

        let mut regular = sample_tx();
        regular.inputs[0].previous_output = OutPoint::new(double_sha256(b"prev"), 1);
        assert!(!regular.finalize().is_coinbase());
    }

    #[test]
    fn test_finalize_caches_ids() {
        let mutable = sample_tx();
        let expected = mutable.txid();
        let tx = mutable.finalize();
        assert_eq!(tx.txid(), expected);
        assert_eq!(tx.wtxid(), expected, "no witness, ids collapse");
    }

    #[test]
    fn test_witness_id_differs_with_witness() {
        let mut mutable = sample_tx();
        mutable.inputs[0].witness.push(vec![0xab; 33]);
        let tx = mutable.finalize();
        assert!(tx.has_witness());
        assert_ne!(tx.txid(), tx.wtxid());
    }

    #[test]
    fn test_roundtrip_through_mutable() {
        let tx = sample_tx().finalize();
        let back = MutableTransaction::from(tx.clone());
        assert_eq!(back.finalize(), tx);
    }

    #[test]
    fn test_value_out_filters_by_tag() {
        let mut mutable = sample_tx();
        mutable.outputs.push(
            TxOut::value(OutputTag::PEGGED, 77, Script::new()).unwrap(),
        );
        mutable
            .outputs
            .push(TxOut::data(OutputTag::PUB_NONCE, vec![1; 8]).unwrap());
        let tx = mutable.finalize();

        assert_eq!(tx.value_out(OutputTag::NATIVE).unwrap(), 1_000);
        assert_eq!(tx.value_out(OutputTag::PEGGED).unwrap(), 77);
        assert!(matches!(
            tx.value_out(OutputTag::PUB_NONCE),
            Err(OutputError::TagMismatch { .. })
        ));
    }

    #[test]
    fn test_value_out_range_error() {
        let mut mutable = sample_tx();
        mutable.outputs.clear();
        mutable.outputs.push(sample_value_out(crate::constants::MAX_MONEY));
        mutable.outputs.push(sample_value_out(1));
        let tx = mutable.finalize();
        assert_eq!(tx.value_out(OutputTag::NATIVE), Err(OutputError::MoneyRange));
    }
}
