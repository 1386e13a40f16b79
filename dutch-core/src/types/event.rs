//! Records emitted by successful operations.

use serde::{Deserialize, Serialize};

use super::asset::{AccountId, Amount, Units};

/// An auction event.
///
/// Events are only recorded for operations that complete; a rolled-back
/// operation leaves no trace in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// The administrator opened the sale.
    Started {
        /// Opening timestamp.
        start_time: u64,
        /// Deadline after which no bids are accepted.
        close_time: u64,
    },

    /// A bid was accepted.
    BidAccepted {
        /// Bidder account.
        bidder: AccountId,
        /// Units allocated by this bid.
        granted_units: Units,
        /// Payment kept for those units.
        cost: Amount,
    },

    /// Payment was returned to a bidder.
    Refunded {
        /// Recipient of the refund.
        bidder: AccountId,
        /// Payment returned.
        amount: Amount,
    },

    /// The sale closed and the clearing price was fixed.
    Closed {
        /// Closing timestamp.
        timestamp: u64,
        /// Uniform price every bidder settles at.
        clearing_price: Amount,
        /// Unsold units destroyed.
        unsold_burned: Units,
    },

    /// A bidder collected their allocation.
    Claimed {
        /// Claiming bidder.
        bidder: AccountId,
        /// Sale tokens delivered.
        units: Units,
        /// Overpayment returned.
        refund: Amount,
    },
}
