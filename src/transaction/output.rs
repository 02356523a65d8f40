//! Dual-purpose transaction outputs
//!
//! Every output slot carries a 16-bit magic tag. The tag's high bit selects
//! the category: clear means a spendable *value* output (amount plus spending
//! script), set means an opaque *data* output (application payload such as a
//! published federation nonce or an oracle price quote). The low bits name a
//! kind within the category. The two categories share one wire storage form
//! but are only reachable through disjoint typed views.

use crate::constants::MAX_MONEY;
use crate::transaction::codec::{write_var_bytes, DecodeError, SliceReader};
use crate::transaction::Script;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Amount in base units (1 EMB = 100_000_000 base units).
pub type Amount = i64;

/// Whether an amount lies inside the valid monetary range.
pub fn money_range(amount: Amount) -> bool {
    (0..=MAX_MONEY).contains(&amount)
}

/// 16-bit output tag. Bit 15 marks the data category; the remaining bits
/// select a payload kind. Kinds outside the known set stay representable so
/// older nodes can relay outputs introduced by later deployments.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputTag(u16);

impl OutputTag {
    /// High bit separating data outputs from value outputs.
    pub const DATA_FLAG: u16 = 0x8000;

    /// Native coin (EMB).
    pub const NATIVE: OutputTag = OutputTag(0x0000);
    /// Pegged stable asset.
    pub const PEGGED: OutputTag = OutputTag(0x0001);
    /// Published federation public nonce.
    pub const PUB_NONCE: OutputTag = OutputTag(0x8000);
    /// Oracle price attestation for the peg.
    pub const PRICE_QUOTE: OutputTag = OutputTag(0x8001);

    pub const fn from_u16(raw: u16) -> Self {
        OutputTag(raw)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    pub const fn is_data(self) -> bool {
        self.0 & Self::DATA_FLAG != 0
    }

    pub const fn is_value(self) -> bool {
        !self.is_data()
    }

    /// Category the tag selects.
    pub const fn kind(self) -> OutputKind {
        if self.is_data() {
            OutputKind::Data
        } else {
            OutputKind::Value
        }
    }
}

impl fmt::Display for OutputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OutputTag::NATIVE => write!(f, "native"),
            OutputTag::PEGGED => write!(f, "pegged"),
            OutputTag::PUB_NONCE => write!(f, "pubnonce"),
            OutputTag::PRICE_QUOTE => write!(f, "pricequote"),
            OutputTag(raw) => write!(f, "unknown(0x{raw:04x})"),
        }
    }
}

impl fmt::Debug for OutputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputTag({self})")
    }
}

/// The two output categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    Value,
    Data,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Value => write!(f, "value"),
            OutputKind::Data => write!(f, "data"),
        }
    }
}

/// Errors from constructing or viewing an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutputError {
    /// The tag selects the other category.
    #[error("output tagged {tag} has no {requested} view")]
    TagMismatch {
        tag: OutputTag,
        requested: OutputKind,
    },
    /// An amount or a running sum left the valid monetary range.
    #[error("amount outside the valid monetary range")]
    MoneyRange,
}

/// Payload of a dual-purpose output, discriminated to match its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxOutPayload {
    /// Spendable amount locked by a script.
    Value { value: Amount, script_pubkey: Script },
    /// Opaque application bytes.
    Data(Vec<u8>),
}

/// A transaction output slot.
///
/// The tag category and the payload variant always agree; the constructors
/// and the wire decoder are the only ways to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTxOut")]
pub struct TxOut {
    tag: OutputTag,
    payload: TxOutPayload,
}

/// Deserialization mirror for [`TxOut`]; re-checked before acceptance.
#[derive(Deserialize)]
struct RawTxOut {
    tag: OutputTag,
    payload: TxOutPayload,
}

impl TryFrom<RawTxOut> for TxOut {
    type Error = OutputError;

    fn try_from(raw: RawTxOut) -> Result<Self, OutputError> {
        match raw.payload {
            TxOutPayload::Value { value, script_pubkey } => {
                TxOut::value(raw.tag, value, script_pubkey)
            }
            TxOutPayload::Data(bytes) => TxOut::data(raw.tag, bytes),
        }
    }
}

impl TxOut {
    /// Build a value output. Fails if `tag` marks the data category.
    pub fn value(tag: OutputTag, value: Amount, script_pubkey: Script) -> Result<Self, OutputError> {
        if tag.is_data() {
            return Err(OutputError::TagMismatch {
                tag,
                requested: OutputKind::Value,
            });
        }
        Ok(TxOut {
            tag,
            payload: TxOutPayload::Value { value, script_pubkey },
        })
    }

    /// Build a data output. Fails if `tag` marks the value category.
    pub fn data(tag: OutputTag, payload: Vec<u8>) -> Result<Self, OutputError> {
        if tag.is_value() {
            return Err(OutputError::TagMismatch {
                tag,
                requested: OutputKind::Data,
            });
        }
        Ok(TxOut {
            tag,
            payload: TxOutPayload::Data(payload),
        })
    }

    pub fn tag(&self) -> OutputTag {
        self.tag
    }

    /// The discriminated payload, for exhaustive matching.
    pub fn payload(&self) -> &TxOutPayload {
        &self.payload
    }

    /// Value view: amount plus spending script.
    pub fn as_value(&self) -> Result<ValueView<'_>, OutputError> {
        match &self.payload {
            TxOutPayload::Value { value, script_pubkey } => Ok(ValueView {
                value: *value,
                script_pubkey,
            }),
            TxOutPayload::Data(_) => Err(OutputError::TagMismatch {
                tag: self.tag,
                requested: OutputKind::Value,
            }),
        }
    }

    /// Data view: the opaque payload bytes.
    pub fn as_data(&self) -> Result<&[u8], OutputError> {
        match &self.payload {
            TxOutPayload::Data(bytes) => Ok(bytes),
            TxOutPayload::Value { .. } => Err(OutputError::TagMismatch {
                tag: self.tag,
                requested: OutputKind::Data,
            }),
        }
    }
}

// Wire form of the payload, shared by both categories: the slot stores the
// tag, a length, and these payload bytes. A value payload is the amount
// followed by the length-prefixed script and must fill the slot exactly; a
// data payload is the raw bytes.
impl TxOut {
    pub(crate) fn raw_payload(&self) -> Vec<u8> {
        match &self.payload {
            TxOutPayload::Value { value, script_pubkey } => {
                let mut out = Vec::with_capacity(9 + script_pubkey.len());
                out.extend_from_slice(&value.to_le_bytes());
                write_var_bytes(&mut out, script_pubkey.as_bytes());
                out
            }
            TxOutPayload::Data(bytes) => bytes.clone(),
        }
    }

    pub(crate) fn from_raw(tag: OutputTag, payload: &[u8]) -> Result<Self, DecodeError> {
        if tag.is_data() {
            return Ok(TxOut {
                tag,
                payload: TxOutPayload::Data(payload.to_vec()),
            });
        }
        let mut r = SliceReader::new(payload);
        let value = r
            .read_i64_le()
            .map_err(|_| DecodeError::MalformedValuePayload)?;
        let script = r.read_var_bytes().map_err(|err| match err {
            DecodeError::UnexpectedEof => DecodeError::MalformedValuePayload,
            other => other,
        })?;
        if !r.is_empty() {
            return Err(DecodeError::MalformedValuePayload);
        }
        Ok(TxOut {
            tag,
            payload: TxOutPayload::Value {
                value,
                script_pubkey: Script::from_bytes(script),
            },
        })
    }
}

/// Borrowed value view of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueView<'a> {
    pub value: Amount,
    pub script_pubkey: &'a Script,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_categories() {
        assert!(OutputTag::NATIVE.is_value());
        assert!(OutputTag::PEGGED.is_value());
        assert!(OutputTag::PUB_NONCE.is_data());
        assert!(OutputTag::PRICE_QUOTE.is_data());
        assert!(OutputTag::from_u16(0x7fff).is_value());
        assert!(OutputTag::from_u16(0xffff).is_data());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(OutputTag::NATIVE.to_string(), "native");
        assert_eq!(OutputTag::PRICE_QUOTE.to_string(), "pricequote");
        assert_eq!(OutputTag::from_u16(0x8042).to_string(), "unknown(0x8042)");
    }

    #[test]
    fn test_constructors_check_category() {
        assert!(TxOut::value(OutputTag::NATIVE, 1, Script::new()).is_ok());
        assert!(matches!(
            TxOut::value(OutputTag::PUB_NONCE, 1, Script::new()),
            Err(OutputError::TagMismatch { .. })
        ));
        assert!(TxOut::data(OutputTag::PUB_NONCE, vec![1, 2]).is_ok());
        assert!(matches!(
            TxOut::data(OutputTag::PEGGED, vec![1, 2]),
            Err(OutputError::TagMismatch { .. })
        ));
    }

    #[test]
    fn test_view_exclusivity() {
        let value_out = TxOut::value(OutputTag::NATIVE, 50, Script::new()).unwrap();
        assert!(value_out.as_value().is_ok());
        assert!(matches!(
            value_out.as_data(),
            Err(OutputError::TagMismatch { .. })
        ));

        let data_out = TxOut::data(OutputTag::PRICE_QUOTE, vec![9; 16]).unwrap();
        assert_eq!(data_out.as_data().unwrap(), &[9; 16][..]);
        assert!(matches!(
            data_out.as_value(),
            Err(OutputError::TagMismatch { .. })
        ));
    }

    #[test]
    fn test_money_range_bounds() {
        assert!(money_range(0));
        assert!(money_range(MAX_MONEY));
        assert!(!money_range(-1));
        assert!(!money_range(MAX_MONEY + 1));
    }

    #[test]
    fn test_serde_rejects_mismatched_payload() {
        let json = r#"{"tag":32768,"payload":{"Value":{"value":5,"script_pubkey":[]}}}"#;
        assert!(serde_json::from_str::<TxOut>(json).is_err());
    }

    #[test]
    fn test_raw_payload_roundtrip() {
        let value_out =
            TxOut::value(OutputTag::PEGGED, 750, Script::from_bytes(vec![0x51, 0x87])).unwrap();
        let raw = value_out.raw_payload();
        assert_eq!(raw.len(), 8 + 1 + 2);
        assert_eq!(TxOut::from_raw(OutputTag::PEGGED, &raw).unwrap(), value_out);

        let data_out = TxOut::data(OutputTag::PRICE_QUOTE, vec![0xde, 0xad]).unwrap();
        assert_eq!(data_out.raw_payload(), vec![0xde, 0xad]);
        assert_eq!(
            TxOut::from_raw(OutputTag::PRICE_QUOTE, &[0xde, 0xad]).unwrap(),
            data_out
        );
    }

    #[test]
    fn test_from_raw_value_must_fill_slot() {
        // Too short for the amount.
        assert_eq!(
            TxOut::from_raw(OutputTag::NATIVE, &[0x01; 4]),
            Err(DecodeError::MalformedValuePayload)
        );
        // Script shorter than declared.
        let mut raw = 9i64.to_le_bytes().to_vec();
        raw.push(0x05);
        raw.extend_from_slice(&[0xaa, 0xbb]);
        assert_eq!(
            TxOut::from_raw(OutputTag::NATIVE, &raw),
            Err(DecodeError::MalformedValuePayload)
        );
        // Unconsumed bytes after the script.
        let mut raw = 9i64.to_le_bytes().to_vec();
        raw.push(0x01);
        raw.extend_from_slice(&[0xaa, 0xbb]);
        assert_eq!(
            TxOut::from_raw(OutputTag::NATIVE, &raw),
            Err(DecodeError::MalformedValuePayload)
        );
    }
}
