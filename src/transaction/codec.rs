//! Canonical wire codec
//!
//! Byte-exact encoding and decoding of transactions in the two consensus
//! forms: *legacy* (witness stacks excluded; hashed for the legacy id) and
//! *full* (witness stacks included behind a marker/flag envelope; hashed for
//! the witness id). Decoding is strict: truncated input, non-minimal compact
//! sizes, unknown envelope flags, and stray bytes all fail instead of being
//! papered over, because any two nodes disagreeing on a single byte here
//! means a chain split.

use crate::crypto::Hash256;
use crate::transaction::{
    MutableTransaction, OutPoint, OutputTag, Script, Transaction, TxIn, TxOut, Witness,
};
use thiserror::Error;

/// Upper bound on any length prefix; larger declarations are rejected
/// before allocation is attempted.
pub const MAX_DECODE_SIZE: u64 = 0x0200_0000;

/// Zero input-count byte that introduces the witness envelope.
pub const WITNESS_MARKER: u8 = 0x00;
/// Envelope flag; the only assigned value.
pub const WITNESS_FLAG: u8 = 0x01;

/// Failures while decoding canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("compact size is not minimally encoded")]
    NonCanonicalCompactSize,
    #[error("declared size {0} exceeds the decode limit")]
    OversizedLength(u64),
    #[error("witness envelope flag 0x{0:02x} is not assigned")]
    BadWitnessFlag(u8),
    #[error("witness envelope present but every stack is empty")]
    SuperfluousWitness,
    #[error("value payload length does not match its contents")]
    MalformedValuePayload,
    #[error("{0} trailing bytes after the encoded object")]
    TrailingBytes(usize),
}

/// Cursor over an immutable byte slice. Bounds are checked before any byte
/// is copied, so hostile length prefixes cannot trigger large allocations.
pub(crate) struct SliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        SliceReader { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_u32_le()? as i32)
    }

    pub(crate) fn read_i64_le(&mut self) -> Result<i64, DecodeError> {
        let bytes = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(arr))
    }

    pub(crate) fn read_hash(&mut self) -> Result<Hash256, DecodeError> {
        let bytes = self.take(32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Hash256::from_bytes(arr))
    }

    /// Read a compact size, insisting on the minimal encoding and the
    /// global size cap.
    pub(crate) fn read_compact_size(&mut self) -> Result<u64, DecodeError> {
        let first = self.read_u8()?;
        let value = match first {
            0xfd => {
                let v = self.read_u16_le()? as u64;
                if v < 0xfd {
                    return Err(DecodeError::NonCanonicalCompactSize);
                }
                v
            }
            0xfe => {
                let v = self.read_u32_le()? as u64;
                if v <= 0xffff {
                    return Err(DecodeError::NonCanonicalCompactSize);
                }
                v
            }
            0xff => {
                let bytes = self.take(8)?;
                let mut arr = [0u8; 8];
                arr.copy_from_slice(bytes);
                let v = u64::from_le_bytes(arr);
                if v <= 0xffff_ffff {
                    return Err(DecodeError::NonCanonicalCompactSize);
                }
                v
            }
            direct => direct as u64,
        };
        if value > MAX_DECODE_SIZE {
            return Err(DecodeError::OversizedLength(value));
        }
        Ok(value)
    }

    /// Read a compact-size-prefixed byte string.
    pub(crate) fn read_var_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_compact_size()? as usize;
        Ok(self.take(len)?.to_vec())
    }
}

pub(crate) fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

pub(crate) fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

fn write_input(out: &mut Vec<u8>, input: &TxIn) {
    out.extend_from_slice(input.previous_output.txid.as_bytes());
    out.extend_from_slice(&input.previous_output.vout.to_le_bytes());
    write_var_bytes(out, input.script_sig.as_bytes());
    out.extend_from_slice(&input.sequence.to_le_bytes());
}

fn read_input(r: &mut SliceReader) -> Result<TxIn, DecodeError> {
    let txid = r.read_hash()?;
    let vout = r.read_u32_le()?;
    let script_sig = Script::from_bytes(r.read_var_bytes()?);
    let sequence = r.read_u32_le()?;
    Ok(TxIn {
        previous_output: OutPoint::new(txid, vout),
        script_sig,
        sequence,
        witness: Witness::new(),
    })
}

fn write_output(out: &mut Vec<u8>, output: &TxOut) {
    out.extend_from_slice(&output.tag().as_u16().to_le_bytes());
    write_var_bytes(out, &output.raw_payload());
}

fn read_output(r: &mut SliceReader) -> Result<TxOut, DecodeError> {
    let tag = OutputTag::from_u16(r.read_u16_le()?);
    let payload = r.read_var_bytes()?;
    TxOut::from_raw(tag, &payload)
}

fn write_witness(out: &mut Vec<u8>, witness: &Witness) {
    write_compact_size(out, witness.len() as u64);
    for item in witness.items() {
        write_var_bytes(out, item);
    }
}

fn read_witness(r: &mut SliceReader) -> Result<Witness, DecodeError> {
    let count = r.read_compact_size()?;
    let mut items = Vec::new();
    for _ in 0..count {
        items.push(r.read_var_bytes()?);
    }
    Ok(Witness::from_items(items))
}

/// Encode the common transaction body, with or without the witness
/// envelope. The envelope is emitted only when a witness is actually
/// present, so the full form of a witness-free transaction is byte-identical
/// to its legacy form.
pub(crate) fn encode_tx(
    version: i32,
    inputs: &[TxIn],
    outputs: &[TxOut],
    lock_time: u32,
    include_witness: bool,
) -> Vec<u8> {
    let has_witness =
        include_witness && inputs.iter().any(|input| !input.witness.is_empty());
    let mut out = Vec::new();
    out.extend_from_slice(&version.to_le_bytes());
    if has_witness {
        out.push(WITNESS_MARKER);
        out.push(WITNESS_FLAG);
    }
    write_compact_size(&mut out, inputs.len() as u64);
    for input in inputs {
        write_input(&mut out, input);
    }
    write_compact_size(&mut out, outputs.len() as u64);
    for output in outputs {
        write_output(&mut out, output);
    }
    if has_witness {
        for input in inputs {
            write_witness(&mut out, &input.witness);
        }
    }
    out.extend_from_slice(&lock_time.to_le_bytes());
    out
}

/// Decode one transaction from the cursor, auto-detecting the witness
/// envelope from the zero input-count marker.
pub(crate) fn decode_tx(r: &mut SliceReader) -> Result<MutableTransaction, DecodeError> {
    let version = r.read_i32_le()?;

    let mut count = r.read_compact_size()?;
    let mut enveloped = false;
    if count == 0 {
        // Zero inputs is not representable; this byte is the envelope marker.
        let flag = r.read_u8()?;
        if flag != WITNESS_FLAG {
            return Err(DecodeError::BadWitnessFlag(flag));
        }
        enveloped = true;
        count = r.read_compact_size()?;
    }

    let mut inputs = Vec::new();
    for _ in 0..count {
        inputs.push(read_input(r)?);
    }

    let output_count = r.read_compact_size()?;
    let mut outputs = Vec::new();
    for _ in 0..output_count {
        outputs.push(read_output(r)?);
    }

    if enveloped {
        for input in &mut inputs {
            input.witness = read_witness(r)?;
        }
        if inputs.iter().all(|input| input.witness.is_empty()) {
            return Err(DecodeError::SuperfluousWitness);
        }
    }

    let lock_time = r.read_u32_le()?;

    Ok(MutableTransaction {
        version,
        lock_time,
        inputs,
        outputs,
    })
}

impl MutableTransaction {
    /// Witness-free canonical encoding (hashed for the legacy id).
    pub fn encode_legacy(&self) -> Vec<u8> {
        encode_tx(self.version, &self.inputs, &self.outputs, self.lock_time, false)
    }

    /// Witness-inclusive canonical encoding (hashed for the witness id).
    pub fn encode_full(&self) -> Vec<u8> {
        encode_tx(self.version, &self.inputs, &self.outputs, self.lock_time, true)
    }

    /// Decode exactly one transaction; trailing bytes are an error.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = SliceReader::new(bytes);
        let tx = decode_tx(&mut r)?;
        if !r.is_empty() {
            return Err(DecodeError::TrailingBytes(r.remaining()));
        }
        Ok(tx)
    }
}

impl Transaction {
    /// Witness-free canonical encoding (hashed for the legacy id).
    pub fn encode_legacy(&self) -> Vec<u8> {
        encode_tx(
            self.version(),
            self.inputs(),
            self.outputs(),
            self.lock_time(),
            false,
        )
    }

    /// Witness-inclusive canonical encoding (hashed for the witness id).
    pub fn encode_full(&self) -> Vec<u8> {
        encode_tx(
            self.version(),
            self.inputs(),
            self.outputs(),
            self.lock_time(),
            true,
        )
    }

    /// Decode and finalize exactly one transaction.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        MutableTransaction::decode(bytes).map(MutableTransaction::finalize)
    }
}
