//! Claim handler.
//!
//! A claim after the deadline also performs the deferred closing when no bid
//! sold out the supply.

use dutch_core::{AccountId, Asset, AuctionEvent, ClaimReceipt, Operation, Stage};

use crate::error::{AuctionError, AuctionResult};
use crate::ledger::LedgerOp;
use crate::pricing::price_at;
use crate::state::AuctionWriter;
use super::context::ExecutionContext;
use super::effects::Effects;
use super::settlement::{fix_clearing, settle_account};

/// Execute a claim.
///
/// Pays the caller their allocated units plus the difference between what
/// they paid and what those units cost at the clearing price. Callers with
/// nothing to claim get [`ClaimReceipt::nothing`] and no transfers.
///
/// # Validation
/// - Stage must not be `Pending`
/// - If `Open`, the deadline must have passed (the sale is closed first)
pub fn execute_claim<S: AuctionWriter>(
    state: &mut S,
    ctx: &ExecutionContext,
    caller: &AccountId,
) -> AuctionResult<Effects<ClaimReceipt>> {
    let mut effects = Effects::new(ClaimReceipt::nothing());

    match state.stage() {
        Stage::Pending => {
            return Err(AuctionError::WrongStage {
                operation: Operation::Claim,
                stage: Stage::Pending,
            })
        }
        Stage::Open => close_at_deadline(state, ctx, &mut effects)?,
        Stage::Closed => {}
    }

    let clearing_price = state.clearing_price().ok_or(AuctionError::WrongStage {
        operation: Operation::Claim,
        stage: state.stage(),
    })?;

    let receipt = match state.account(caller) {
        Some(account) if account.has_claimable() => settle_account(account, clearing_price)?,
        _ => {
            tracing::debug!(caller = %dutch_core::short_hex(caller), "Nothing to claim");
            return Ok(effects);
        }
    };

    state.update_account(caller, |account| account.claimed = true);

    tracing::debug!(
        caller = %dutch_core::short_hex(caller),
        units = receipt.payout_units,
        refund = receipt.refund_amount,
        clearing_price,
        "Claim settled"
    );

    effects.push_op(LedgerOp::TransferOut {
        asset: Asset::SaleToken,
        to: *caller,
        amount: receipt.payout_units.into(),
    });
    effects.push_event(AuctionEvent::Claimed {
        bidder: *caller,
        units: receipt.payout_units,
        refund: receipt.refund_amount,
    });
    if receipt.refund_amount > 0 {
        effects.push_op(LedgerOp::TransferOut {
            asset: Asset::Payment,
            to: *caller,
            amount: receipt.refund_amount,
        });
        effects.push_event(AuctionEvent::Refunded {
            bidder: *caller,
            amount: receipt.refund_amount,
        });
    }

    effects.outcome = receipt;
    Ok(effects)
}

/// Close an open sale whose deadline has passed.
///
/// The clearing price is the price at the deadline itself, not at the moment
/// the closing is detected.
fn close_at_deadline<S: AuctionWriter>(
    state: &mut S,
    ctx: &ExecutionContext,
    effects: &mut Effects<ClaimReceipt>,
) -> AuctionResult<()> {
    let (start_time, close_time) = match (state.start_time(), state.close_time()) {
        (Some(start), Some(close)) => (start, close),
        _ => {
            return Err(AuctionError::WrongStage {
                operation: Operation::Claim,
                stage: state.stage(),
            })
        }
    };

    if ctx.timestamp < close_time {
        return Err(AuctionError::SaleStillRunning {
            close_time,
            now: ctx.timestamp,
        });
    }

    let clearing_price = price_at(state.parameters(), start_time, close_time);
    let settlement = fix_clearing(state, clearing_price, close_time)?;
    effects.push_op(settlement.burn_op());
    effects.push_event(settlement.event());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::execute_bid;
    use crate::state::{AuctionReader, AuctionState};
    use dutch_core::SaleParameters;

    const ALICE: AccountId = [0xA1; 20];
    const BOB: AccountId = [0xB0; 20];
    const START: u64 = 1_700_000_000;

    fn open_state() -> AuctionState {
        let params = SaleParameters::new(2000, 1000, 1, 5000).unwrap();
        let mut state = AuctionState::new(params, [9u8; 20]);
        state.open(START, START + 1_200);
        state
    }

    fn at(offset: u64) -> ExecutionContext {
        ExecutionContext::with_timestamp(START + offset)
    }

    #[test]
    fn test_claim_while_pending() {
        let params = SaleParameters::new(2000, 1000, 1, 5000).unwrap();
        let mut state = AuctionState::new(params, [9u8; 20]);

        let result = execute_claim(&mut state, &at(0), &ALICE);
        assert!(matches!(
            result,
            Err(AuctionError::WrongStage { operation: Operation::Claim, stage: Stage::Pending })
        ));
    }

    #[test]
    fn test_claim_before_deadline() {
        let mut state = open_state();
        execute_bid(&mut state, &at(600), &ALICE, 500, 700_000).unwrap();

        let result = execute_claim(&mut state, &at(1_199), &ALICE);
        assert_eq!(
            result.unwrap_err(),
            AuctionError::SaleStillRunning { close_time: START + 1_200, now: START + 1_199 }
        );
        assert_eq!(state.stage(), Stage::Open);
    }

    #[test]
    fn test_first_claim_after_deadline_closes() {
        let mut state = open_state();
        execute_bid(&mut state, &at(600), &ALICE, 500, 700_000).unwrap();
        execute_bid(&mut state, &at(1_140), &BOB, 1000, 1_000_000).unwrap();

        let effects = execute_claim(&mut state, &at(1_500), &ALICE).unwrap();
        assert_eq!(state.stage(), Stage::Closed);
        assert_eq!(state.clearing_price(), Some(1000));
        assert_eq!(state.closed_at(), Some(START + 1_200));
        assert_eq!(state.unsold_burned(), 3500);

        assert_eq!(effects.outcome, ClaimReceipt { payout_units: 500, refund_amount: 200_000 });
        assert_eq!(
            effects.ops,
            vec![
                LedgerOp::Burn { asset: Asset::SaleToken, amount: 3500 },
                LedgerOp::TransferOut { asset: Asset::SaleToken, to: ALICE, amount: 500 },
                LedgerOp::TransferOut { asset: Asset::Payment, to: ALICE, amount: 200_000 },
            ]
        );
        assert!(state.invariants_hold());
    }

    #[test]
    fn test_second_claim_is_noop() {
        let mut state = open_state();
        execute_bid(&mut state, &at(600), &ALICE, 500, 700_000).unwrap();
        execute_claim(&mut state, &at(1_500), &ALICE).unwrap();

        let effects = execute_claim(&mut state, &at(1_600), &ALICE).unwrap();
        assert!(effects.outcome.is_nothing());
        assert!(effects.ops.is_empty());
        assert!(effects.events.is_empty());
        assert!(state.account(&ALICE).unwrap().claimed);
    }

    #[test]
    fn test_claim_without_bids() {
        let mut state = open_state();

        let effects = execute_claim(&mut state, &at(1_200), &BOB).unwrap();
        assert!(effects.outcome.is_nothing());
        // Closing still happens and burns the whole supply
        assert_eq!(
            effects.ops,
            vec![LedgerOp::Burn { asset: Asset::SaleToken, amount: 5000 }]
        );
        assert_eq!(state.clearing_price(), Some(1000));
        assert_eq!(state.bidder_count(), 0);
    }

    #[test]
    fn test_claim_after_sellout_no_refund() {
        let mut state = open_state();
        execute_bid(&mut state, &at(0), &ALICE, 5000, 5000 * 2000).unwrap();

        let effects = execute_claim(&mut state, &at(1), &ALICE).unwrap();
        assert_eq!(effects.outcome, ClaimReceipt { payout_units: 5000, refund_amount: 0 });
        assert_eq!(effects.ops.len(), 1);
        assert_eq!(
            effects.events,
            vec![AuctionEvent::Claimed { bidder: ALICE, units: 5000, refund: 0 }]
        );
    }
}
