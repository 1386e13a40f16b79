//! Results returned to callers of the public operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::asset::{Amount, Units};

/// The public operations, used when reporting errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Administrator opens the sale.
    Start,
    /// A bidder reserves units.
    Bid,
    /// A bidder collects units and refund after closing.
    Claim,
    /// Reading the current or clearing price.
    PriceQuery,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Start => write!(f, "start"),
            Operation::Bid => write!(f, "bid"),
            Operation::Claim => write!(f, "claim"),
            Operation::PriceQuery => write!(f, "price query"),
        }
    }
}

/// Outcome of an accepted bid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidReceipt {
    /// Units actually reserved (`<=` requested and `<=` remaining supply).
    pub granted_units: Units,

    /// `granted_units * price`, retained by the engine.
    pub cost: Amount,

    /// Overpayment returned immediately.
    pub refund: Amount,

    /// Unit price the bid was charged at.
    pub price: Amount,

    /// Whether this bid sold out the supply and closed the sale.
    pub closed: bool,
}

/// Outcome of a claim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Sale-token units transferred to the caller.
    pub payout_units: Units,

    /// Payment returned because the clearing price undercut the bid prices.
    pub refund_amount: Amount,
}

impl ClaimReceipt {
    /// The receipt for a caller with nothing to claim.
    pub fn nothing() -> Self {
        Self::default()
    }

    /// True when nothing was paid out.
    pub fn is_nothing(&self) -> bool {
        self.payout_units == 0 && self.refund_amount == 0
    }
}
