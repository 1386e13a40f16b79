//! Bid handler.

use dutch_core::{AccountId, Amount, Asset, AuctionEvent, BidReceipt, Operation, Stage, Units};

use crate::error::{AuctionError, AuctionResult};
use crate::ledger::LedgerOp;
use crate::pricing::price_at;
use crate::state::AuctionWriter;
use super::context::ExecutionContext;
use super::effects::Effects;
use super::settlement::fix_clearing;

/// Execute a bid.
///
/// Reserves `min(requested, remaining)` units at the current price and
/// retains their cost. Any overpayment is returned in the same operation.
/// A bid that takes the last unit closes the sale at its own price.
///
/// # Validation
/// - Stage must be `Open`
/// - `ctx.timestamp` must be before the deadline
/// - `requested_units` must be positive
/// - `payment` must cover the granted units at the current price
pub fn execute_bid<S: AuctionWriter>(
    state: &mut S,
    ctx: &ExecutionContext,
    bidder: &AccountId,
    requested_units: Units,
    payment: Amount,
) -> AuctionResult<Effects<BidReceipt>> {
    let (start_time, close_time) = match (state.stage(), state.start_time(), state.close_time()) {
        (Stage::Open, Some(start), Some(close)) => (start, close),
        (stage, _, _) => {
            return Err(AuctionError::WrongStage {
                operation: Operation::Bid,
                stage,
            })
        }
    };

    // Late bids are refused; closing is left to the next claim
    if ctx.timestamp >= close_time {
        return Err(AuctionError::SaleExpired {
            close_time,
            now: ctx.timestamp,
        });
    }

    if requested_units == 0 {
        return Err(AuctionError::ZeroUnits);
    }

    let price = price_at(state.parameters(), start_time, ctx.timestamp);
    let granted_units = requested_units.min(state.remaining_supply());
    let cost = Amount::from(granted_units)
        .checked_mul(price)
        .ok_or(AuctionError::ArithmeticOverflow)?;

    if payment < cost {
        return Err(AuctionError::InsufficientPayment {
            required: cost,
            provided: payment,
        });
    }
    let refund = payment - cost;

    // Compute everything fallible before the first mutation
    let paid_total = state
        .account(bidder)
        .map_or(0, |a| a.paid_total)
        .checked_add(cost)
        .ok_or(AuctionError::ArithmeticOverflow)?;
    let total_allocated = state.total_allocated() + granted_units;

    let account = state.get_or_create_account(bidder);
    account.allocated_units += granted_units;
    account.paid_total = paid_total;
    state.set_total_allocated(total_allocated);

    tracing::debug!(
        bidder = %dutch_core::short_hex(bidder),
        requested_units,
        granted_units,
        price,
        cost,
        refund,
        "Bid accepted"
    );

    let mut effects = Effects::new(BidReceipt {
        granted_units,
        cost,
        refund,
        price,
        closed: false,
    });
    effects.push_op(LedgerOp::Collect {
        from: *bidder,
        amount: payment,
    });
    effects.push_event(AuctionEvent::BidAccepted {
        bidder: *bidder,
        granted_units,
        cost,
    });

    if state.remaining_supply() == 0 {
        let settlement = fix_clearing(state, price, ctx.timestamp)?;
        effects.push_op(settlement.burn_op());
        effects.push_event(settlement.event());
        effects.outcome.closed = true;
    }

    if refund > 0 {
        effects.push_op(LedgerOp::TransferOut {
            asset: Asset::Payment,
            to: *bidder,
            amount: refund,
        });
        effects.push_event(AuctionEvent::Refunded {
            bidder: *bidder,
            amount: refund,
        });
    }

    Ok(effects)
}
