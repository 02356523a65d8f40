//! Script byte strings
//!
//! Scripts are opaque to this layer: the interpreter lives in the external
//! validation engine. What lives here is the canonical byte form plus the
//! small push builder needed to assemble the compiled-in genesis scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Push the next byte as a length (1..=75 bytes of data follow directly).
pub const MAX_DIRECT_PUSH: usize = 0x4b;
pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_16: u8 = 0x60;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Serialized script.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a raw opcode byte.
    pub fn push_opcode(&mut self, op: u8) -> &mut Self {
        self.0.push(op);
        self
    }

    /// Append a data push of `data`, choosing the shortest length prefix.
    pub fn push_slice(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= MAX_DIRECT_PUSH {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
        self
    }

    /// Append an integer push.
    ///
    /// 0, -1 and 1..=16 use their dedicated opcodes; anything else is pushed
    /// as a minimally-encoded little-endian signed number.
    pub fn push_num(&mut self, n: i64) -> &mut Self {
        if n == 0 {
            self.0.push(OP_0);
        } else if n == -1 {
            self.0.push(OP_1NEGATE);
        } else if (1..=16).contains(&n) {
            self.0.push(OP_1 + (n as u8 - 1));
        } else {
            let encoded = encode_script_num(n);
            self.push_slice(&encoded);
        }
        self
    }
}

/// Minimal little-endian signed number encoding used inside scripts: the
/// magnitude little-endian, with the top bit of the last byte reserved for
/// the sign (an extra byte is appended when the magnitude already uses it).
fn encode_script_num(n: i64) -> Vec<u8> {
    let negative = n < 0;
    let mut magnitude = n.unsigned_abs();
    let mut out = Vec::new();
    while magnitude > 0 {
        out.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    let top_bit_used = out.last().is_some_and(|b| b & 0x80 != 0);
    if top_bit_used {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        let last = out.len() - 1;
        out[last] |= 0x80;
    }
    out
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", hex::encode(&self.0))
    }
}
