//! Consensus module - Block structure, parameters, and the reward schedule

mod block;
mod params;
mod rewards;

pub use block::*;
pub use params::*;
pub use rewards::*;
