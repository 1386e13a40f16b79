//! Per-bidder accounting.

use serde::{Deserialize, Serialize};

use super::asset::{Amount, Units};

/// What the engine owes one bidder.
///
/// Created lazily on the first accepted bid and never removed. Both totals
/// only grow while the sale is open; claiming marks the entry settled rather
/// than erasing it, so the allocation history stays summable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidderAccount {
    /// Units reserved for this bidder across all bids.
    pub allocated_units: Units,

    /// Payment retained for this bidder, excluding bid-time refunds.
    pub paid_total: Amount,

    /// Set once the allocation and refund have been paid out.
    pub claimed: bool,
}

impl BidderAccount {
    /// True when a claim would pay something out.
    pub fn has_claimable(&self) -> bool {
        !self.claimed && self.allocated_units > 0
    }
}
