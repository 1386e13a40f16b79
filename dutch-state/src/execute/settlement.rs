//! Settlement resolver.
//!
//! Runs once, when the stage moves to `Closed`: fixes the uniform clearing
//! price and sizes the unsold remainder for burning. Per-bidder entitlements
//! are derived from the fixed price at claim time.

use dutch_core::{Amount, Asset, AuctionEvent, BidderAccount, ClaimReceipt, Units};

use crate::error::{AuctionError, AuctionResult};
use crate::ledger::LedgerOp;
use crate::state::AuctionWriter;

/// The result of closing the sale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Uniform price every winning bidder pays.
    pub clearing_price: Amount,

    /// Units nobody bought.
    pub unsold: Units,

    /// Closing timestamp.
    pub closed_at: u64,
}

impl Settlement {
    /// Instruction disposing of the unsold remainder.
    pub fn burn_op(&self) -> LedgerOp {
        LedgerOp::Burn {
            asset: Asset::SaleToken,
            amount: Amount::from(self.unsold),
        }
    }

    /// The closing event.
    pub fn event(&self) -> AuctionEvent {
        AuctionEvent::Closed {
            timestamp: self.closed_at,
            clearing_price: self.clearing_price,
            unsold_burned: self.unsold,
        }
    }
}

/// Close the sale at `clearing_price`.
///
/// Fails if a clearing price is already set; the price can be fixed once.
pub fn fix_clearing<S: AuctionWriter>(
    state: &mut S,
    clearing_price: Amount,
    closed_at: u64,
) -> AuctionResult<Settlement> {
    if let Some(price) = state.clearing_price() {
        return Err(AuctionError::ClearingAlreadyFixed { price });
    }

    let unsold = state.remaining_supply();
    state.close(closed_at, clearing_price, unsold);

    tracing::info!(
        clearing_price,
        unsold,
        sold = state.total_allocated(),
        closed_at,
        "Auction closed"
    );

    Ok(Settlement {
        clearing_price,
        unsold,
        closed_at,
    })
}

/// Compute what a bidder receives at `clearing_price`.
///
/// `refund = paid_total - allocated_units * clearing_price`. The clearing
/// price never exceeds a price the bidder paid, so the subtraction cannot
/// underflow for state produced by the handlers.
pub fn settle_account(account: &BidderAccount, clearing_price: Amount) -> AuctionResult<ClaimReceipt> {
    let due = Amount::from(account.allocated_units)
        .checked_mul(clearing_price)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    let refund = account
        .paid_total
        .checked_sub(due)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    Ok(ClaimReceipt {
        payout_units: account.allocated_units,
        refund_amount: refund,
    })
}
