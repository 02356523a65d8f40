//! Block reward calculation
//!
//! Deterministic subsidy schedule: the reward starts at 2048 EMB and halves
//! every `subsidy_halving_interval` blocks, so the total issuance approaches
//! but never reaches MAX_MONEY.

use crate::consensus::ConsensusParams;
use crate::constants::INITIAL_SUBSIDY;
use crate::transaction::Amount;

/// Calculate the block subsidy for a given height
///
/// This is a pure, deterministic function of the height and the halving
/// interval. Fees are accounted elsewhere.
pub fn block_subsidy(height: i32, params: &ConsensusParams) -> Amount {
    let halvings = height / params.subsidy_halving_interval;
    // The shift below is undefined past 63 bits; the subsidy is long gone.
    if halvings >= 64 {
        return 0;
    }
    INITIAL_SUBSIDY >> halvings
}
