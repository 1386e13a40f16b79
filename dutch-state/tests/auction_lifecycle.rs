//! End-to-end auction flows against the in-memory ledger.

mod common;

use common::*;

use dutch_core::{Asset, AuctionEvent, ClaimReceipt, Operation, Stage};
use dutch_state::{AuctionError, ErrorKind, LedgerError};

// ============================================================================
// Reference scenario
// ============================================================================

#[test]
fn test_reference_price_points() {
    let ctx = TestContext::started();

    ctx.at(600);
    assert_eq!(ctx.auction.current_price(), Ok(1400));

    ctx.at(1140);
    assert_eq!(ctx.auction.current_price(), Ok(1000));
}

#[test]
fn test_reference_overpaid_bid() {
    let mut ctx = TestContext::started();
    ctx.at(600);

    let receipt = ctx.bid(&alice(), 500, 1_000_000).unwrap();
    assert_eq!(receipt.granted_units, 500);
    assert_eq!(receipt.cost, 700_000);
    assert_eq!(receipt.refund, 300_000);
    assert!(!receipt.closed);

    assert_eq!(ctx.payment_of(&alice()), BIDDER_FUNDS - 700_000);
    assert_eq!(ctx.ledger.custody_balance(Asset::Payment), 700_000);
    assert_eq!(ctx.auction.account_of(&alice()).paid_total, 700_000);
    ctx.assert_payment_conserved();
}

#[test]
fn test_oversized_bid_sells_out() {
    let mut ctx = TestContext::started();
    ctx.at(300);

    let receipt = ctx.bid(&alice(), 6000, 6000 * 1700).unwrap();
    assert_eq!(receipt.granted_units, 5000);
    assert_eq!(receipt.cost, 5000 * 1700);
    assert_eq!(receipt.refund, 1000 * 1700);
    assert!(receipt.closed);

    assert_eq!(ctx.auction.stage(), Stage::Closed);
    assert_eq!(ctx.auction.clearing_price(), Ok(1700));
    assert_eq!(ctx.auction.closed_at(), Some(T0 + 300));
    assert_eq!(ctx.ledger.burned(Asset::SaleToken), 0);
}

#[test]
fn test_late_bid_rejected_without_closing() {
    let mut ctx = TestContext::started();
    ctx.at(1_200);

    let err = ctx.bid(&alice(), 10, 100_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongStage);
    assert_eq!(ctx.auction.stage(), Stage::Open);
    assert!(ctx.auction.clearing_price().is_err());
    assert_eq!(ctx.ledger.burned(Asset::SaleToken), 0);
}

#[test]
fn test_claim_before_anything() {
    let mut ctx = TestContext::new();
    let err = ctx.claim(&alice()).unwrap_err();
    assert_eq!(
        err,
        AuctionError::WrongStage { operation: Operation::Claim, stage: Stage::Pending }
    );

    ctx.start().unwrap();
    ctx.at(100);
    assert_eq!(ctx.claim(&alice()).unwrap_err().kind(), ErrorKind::WrongStage);
}

#[test]
fn test_non_bidder_claim_after_close_is_noop() {
    let mut ctx = TestContext::started();
    ctx.at(10);
    ctx.bid(&alice(), 5000, 5000 * 1990).unwrap();

    let receipt = ctx.claim(&carol()).unwrap();
    assert_eq!(receipt, ClaimReceipt::nothing());
    assert_eq!(ctx.payment_of(&carol()), BIDDER_FUNDS);
    assert_eq!(ctx.tokens_of(&carol()), 0);
}

#[test]
fn test_start_only_by_administrator() {
    let mut ctx = TestContext::new();
    let err = ctx.auction.start(&mut ctx.ledger, &alice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    ctx.start().unwrap();
    assert_eq!(ctx.start().unwrap_err().kind(), ErrorKind::WrongStage);
}

// ============================================================================
// Settlement
// ============================================================================

/// Two bidders split the supply; the second bid sells out at a lower price
/// and both settle at that price.
#[test]
fn test_sellout_settlement() {
    let mut ctx = TestContext::started();

    ctx.at(1);
    ctx.bid(&alice(), 2500, 2500 * 1999).unwrap();
    ctx.at(2);
    let receipt = ctx.bid(&bob(), 2500, 2500 * 1998).unwrap();
    assert!(receipt.closed);
    assert_eq!(ctx.auction.clearing_price(), Ok(1998));

    let alice_claim = ctx.claim(&alice()).unwrap();
    assert_eq!(alice_claim, ClaimReceipt { payout_units: 2500, refund_amount: 2500 });
    let bob_claim = ctx.claim(&bob()).unwrap();
    assert_eq!(bob_claim, ClaimReceipt { payout_units: 2500, refund_amount: 0 });

    assert_eq!(ctx.tokens_of(&alice()), 2500);
    assert_eq!(ctx.tokens_of(&bob()), 2500);
    assert_eq!(ctx.payment_of(&alice()), BIDDER_FUNDS - 2500 * 1998);
    assert_eq!(ctx.ledger.custody_balance(Asset::Payment), 5000 * 1998);
    assert_eq!(ctx.ledger.custody_balance(Asset::SaleToken), 0);

    ctx.assert_payment_conserved();
    ctx.assert_tokens_conserved();
}

#[test]
fn test_deadline_settlement_burns_unsold() {
    let mut ctx = TestContext::started();

    ctx.at(600);
    ctx.bid(&alice(), 500, 700_000).unwrap();
    ctx.at(900);
    ctx.bid(&bob(), 1000, 1_100_000).unwrap();

    // First claim well after the deadline still clears at the deadline price
    ctx.at(5_000);
    let receipt = ctx.claim(&bob()).unwrap();
    assert_eq!(ctx.auction.stage(), Stage::Closed);
    assert_eq!(ctx.auction.clearing_price(), Ok(1000));
    assert_eq!(ctx.auction.closed_at(), Some(T0 + 1_200));
    assert_eq!(receipt, ClaimReceipt { payout_units: 1000, refund_amount: 100_000 });

    assert_eq!(ctx.ledger.burned(Asset::SaleToken), 3500);
    assert_eq!(ctx.auction.snapshot().unsold_burned, 3500);

    let receipt = ctx.claim(&alice()).unwrap();
    assert_eq!(receipt, ClaimReceipt { payout_units: 500, refund_amount: 200_000 });

    assert_eq!(ctx.ledger.custody_balance(Asset::Payment), 1500 * 1000);
    assert_eq!(ctx.ledger.custody_balance(Asset::SaleToken), 0);
    ctx.assert_payment_conserved();
    ctx.assert_tokens_conserved();
}

#[test]
fn test_deadline_clearing_above_floor() {
    // Decay too slow to reach the floor within the window
    let params = dutch_core::SaleParameters::new(2000, 100, 1, SUPPLY).unwrap();
    let clock = dutch_state::ManualClock::new(T0);
    let auction = dutch_state::DutchAuction::new(
        params,
        admin(),
        clock.clone(),
        dutch_state::AuctionConfig::default(),
    )
    .unwrap();
    let mut ledger = funded_ledger();
    auction.start(&mut ledger, &admin()).unwrap();

    clock.set(T0 + 100);
    auction.bid(&mut ledger, &alice(), 10, 19_000).unwrap();

    clock.set(T0 + 10_000);
    let receipt = auction.claim(&mut ledger, &alice()).unwrap();
    assert_eq!(auction.clearing_price(), Ok(800));
    assert_eq!(receipt.refund_amount, 19_000 - 10 * 800);
}

#[test]
fn test_double_claim_pays_once() {
    let mut ctx = TestContext::started();
    ctx.at(600);
    ctx.bid(&alice(), 500, 700_000).unwrap();
    ctx.at(1_200);

    ctx.claim(&alice()).unwrap();
    let second = ctx.claim(&alice()).unwrap();
    assert!(second.is_nothing());
    assert_eq!(ctx.tokens_of(&alice()), 500);
    assert_eq!(ctx.payment_of(&alice()), BIDDER_FUNDS - 500_000);
}

#[test]
fn test_event_log() {
    let mut ctx = TestContext::started();
    ctx.at(1);
    ctx.bid(&alice(), 5000, 5000 * 1999 + 7).unwrap();
    ctx.claim(&alice()).unwrap();

    let events = ctx.auction.events();
    assert_eq!(
        events,
        vec![
            AuctionEvent::Started { start_time: T0, close_time: T0 + 1_200 },
            AuctionEvent::BidAccepted { bidder: alice(), granted_units: 5000, cost: 5000 * 1999 },
            AuctionEvent::Closed { timestamp: T0 + 1, clearing_price: 1999, unsold_burned: 0 },
            AuctionEvent::Refunded { bidder: alice(), amount: 7 },
            AuctionEvent::Claimed { bidder: alice(), units: 5000, refund: 0 },
        ]
    );
}

// ============================================================================
// Value conservation
// ============================================================================

#[test]
fn test_value_conserved_over_many_bids() {
    let mut ctx = TestContext::started();
    let bidders = [alice(), bob(), carol(), mallory()];

    for (i, offset) in (0..1_200).step_by(97).enumerate() {
        ctx.at(offset);
        let bidder = bidders[i % bidders.len()];
        let units = 37 + (i as u64 * 11);
        let price = ctx.auction.current_price().unwrap();
        ctx.bid(&bidder, units, price * u128::from(units) + 13).unwrap();
        ctx.assert_payment_conserved();
        assert!(ctx.auction.snapshot().invariants_hold());
    }

    ctx.at(2_000);
    for bidder in bidders {
        ctx.claim(&bidder).unwrap();
    }

    let clearing = ctx.auction.clearing_price().unwrap();
    let sold = ctx.auction.total_allocated();
    assert_eq!(ctx.ledger.custody_balance(Asset::Payment), u128::from(sold) * clearing);
    assert_eq!(ctx.ledger.custody_balance(Asset::SaleToken), 0);
    for bidder in bidders {
        let account = ctx.auction.account_of(&bidder);
        assert_eq!(ctx.tokens_of(&bidder), u128::from(account.allocated_units));
        assert_eq!(
            ctx.payment_of(&bidder),
            BIDDER_FUNDS - u128::from(account.allocated_units) * clearing
        );
    }
    ctx.assert_payment_conserved();
    ctx.assert_tokens_conserved();
}

// ============================================================================
// Rollback on ledger failure
// ============================================================================

#[test]
fn test_bid_rolled_back_when_refund_rejected() {
    let mut ctx = TestContext::started();
    ctx.at(600);
    ctx.ledger.reject_transfers_to(&alice());
    let before = ctx.auction.snapshot();
    let events_before = ctx.auction.events();

    let err = ctx.bid(&alice(), 500, 1_000_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerFailure);
    assert!(matches!(
        err,
        AuctionError::Ledger(LedgerError::RecipientRejected { asset: Asset::Payment, .. })
    ));

    assert_eq!(ctx.auction.snapshot(), before);
    assert_eq!(ctx.auction.events(), events_before);
    assert_eq!(ctx.payment_of(&alice()), BIDDER_FUNDS);
    assert_eq!(ctx.ledger.custody_balance(Asset::Payment), 0);
    assert_eq!(ctx.ledger.open_checkpoints(), 0);

    // Exact payment needs no refund and goes through
    ctx.bid(&alice(), 500, 700_000).unwrap();
}

#[test]
fn test_deadline_close_rolled_back_when_payout_rejected() {
    let mut ctx = TestContext::started();
    ctx.at(600);
    ctx.bid(&alice(), 500, 700_000).unwrap();
    ctx.at(1_300);

    ctx.ledger.reject_transfers_to(&alice());
    let err = ctx.claim(&alice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerFailure);

    // Closing and burn are undone together with the payout
    assert_eq!(ctx.auction.stage(), Stage::Open);
    assert!(ctx.auction.clearing_price().is_err());
    assert_eq!(ctx.ledger.burned(Asset::SaleToken), 0);
    assert!(!ctx.auction.account_of(&alice()).claimed);

    ctx.ledger.accept_transfers_to(&alice());
    let receipt = ctx.claim(&alice()).unwrap();
    assert_eq!(receipt, ClaimReceipt { payout_units: 500, refund_amount: 200_000 });
    assert_eq!(ctx.ledger.burned(Asset::SaleToken), 4500);
}

#[test]
fn test_bid_without_funds() {
    let mut ctx = TestContext::started();
    let broke = dutch_core::derive_account("broke");

    let err = ctx.bid(&broke, 1, 2000).unwrap_err();
    assert!(matches!(
        err,
        AuctionError::Ledger(LedgerError::InsufficientBalance { available: 0, .. })
    ));
    assert_eq!(ctx.auction.total_allocated(), 0);
    assert_eq!(ctx.auction.account_of(&broke).allocated_units, 0);
}

#[test]
fn test_start_without_escrow() {
    let mut ctx = TestContext::new();
    ctx.ledger = dutch_state::InMemoryLedger::new(engine());

    let err = ctx.start().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunding);
    assert_eq!(ctx.auction.stage(), Stage::Pending);
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_resume_mid_sale() {
    let mut ctx = TestContext::started();
    ctx.at(600);
    ctx.bid(&alice(), 500, 700_000).unwrap();

    let bytes = ctx.auction.snapshot_bytes().unwrap();
    let resumed = dutch_state::DutchAuction::from_snapshot_bytes(
        &bytes,
        ctx.clock.clone(),
        dutch_state::AuctionConfig::default(),
    )
    .unwrap();

    ctx.at(1_500);
    let receipt = resumed.claim(&mut ctx.ledger, &alice()).unwrap();
    assert_eq!(receipt.refund_amount, 200_000);
    assert_eq!(resumed.stage(), Stage::Closed);
}
