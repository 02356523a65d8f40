//! Transaction primitives
//!
//! Outpoints, inputs with their witness stacks, dual-purpose tagged outputs,
//! the mutable builder form and the finalized form with cached ids, and the
//! canonical wire codec shared by both.

pub(crate) mod codec;
mod output;
mod script;
mod tx;

pub use codec::{DecodeError, MAX_DECODE_SIZE, WITNESS_FLAG, WITNESS_MARKER};
pub use output::*;
pub use script::*;
pub use tx::*;
