//! Operation requests and their results.

use serde::{Deserialize, Serialize};

use dutch_core::{Amount, BidReceipt, ClaimReceipt, Operation, Units};

/// A request to the engine, for callers that dispatch generically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Open the sale.
    Start,
    /// Reserve units at the current price.
    Bid {
        requested_units: Units,
        payment: Amount,
    },
    /// Collect units and refund after closing.
    Claim,
}

impl Command {
    /// The operation this command performs.
    pub fn operation(&self) -> Operation {
        match self {
            Command::Start => Operation::Start,
            Command::Bid { .. } => Operation::Bid,
            Command::Claim => Operation::Claim,
        }
    }
}

/// Result of a successful [`Command`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The sale is open.
    Started,
    /// A bid was accepted.
    Bid(BidReceipt),
    /// A claim was settled (possibly with nothing to pay).
    Claimed(ClaimReceipt),
}
