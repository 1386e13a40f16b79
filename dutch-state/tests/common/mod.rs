//! Shared test helpers for dutch-state integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use dutch_core::{derive_account, AccountId, Amount, Asset, BidReceipt, ClaimReceipt, SaleParameters, Units};
use dutch_state::{
    AuctionConfig, AuctionResult, Command, DutchAuction, InMemoryLedger, LedgerCheckpoint,
    LedgerResult, ManualClock, Outcome, ValueLedger,
};

/// Start of every test sale (2023-11-14).
pub const T0: u64 = 1_700_000_000;

/// Reference supply.
pub const SUPPLY: Units = 5000;

/// Payment balance every bidder starts with.
pub const BIDDER_FUNDS: Amount = 100_000_000;

pub fn admin() -> AccountId {
    derive_account("deployer")
}

pub fn engine() -> AccountId {
    derive_account("dutch-auction-engine")
}

pub fn alice() -> AccountId {
    derive_account("alice")
}

pub fn bob() -> AccountId {
    derive_account("bob")
}

pub fn carol() -> AccountId {
    derive_account("carol")
}

pub fn mallory() -> AccountId {
    derive_account("mallory")
}

/// Reference parameters: 2000 falling by 1/s to 1000, 5000 units.
pub fn reference_params() -> SaleParameters {
    SaleParameters::new(2000, 1000, 1, SUPPLY).unwrap()
}

/// A ledger where the administrator escrowed the supply and every test
/// participant holds [`BIDDER_FUNDS`].
pub fn funded_ledger() -> InMemoryLedger {
    let mut ledger = InMemoryLedger::new(engine());
    ledger.mint(Asset::SaleToken, &admin(), Amount::from(SUPPLY));
    ledger
        .transfer(Asset::SaleToken, &admin(), &engine(), Amount::from(SUPPLY))
        .unwrap();
    for bidder in [alice(), bob(), carol(), mallory()] {
        ledger.mint(Asset::Payment, &bidder, BIDDER_FUNDS);
    }
    ledger
}

/// Auction, ledger and clock for one test.
pub struct TestContext {
    pub auction: Rc<DutchAuction<ManualClock>>,
    pub ledger: InMemoryLedger,
    pub clock: ManualClock,
}

impl TestContext {
    /// Pending auction with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AuctionConfig::default())
    }

    /// Pending auction with a custom configuration.
    pub fn with_config(config: AuctionConfig) -> Self {
        let clock = ManualClock::new(T0);
        let auction = DutchAuction::new(reference_params(), admin(), clock.clone(), config).unwrap();
        Self {
            auction: Rc::new(auction),
            ledger: funded_ledger(),
            clock,
        }
    }

    /// Auction already started at [`T0`].
    pub fn started() -> Self {
        let mut ctx = Self::new();
        ctx.start().unwrap();
        ctx
    }

    /// Set the clock to `T0 + offset`.
    pub fn at(&self, offset: u64) {
        self.clock.set(T0 + offset);
    }

    pub fn start(&mut self) -> AuctionResult<()> {
        self.auction.start(&mut self.ledger, &admin())
    }

    pub fn bid(&mut self, bidder: &AccountId, units: Units, payment: Amount) -> AuctionResult<BidReceipt> {
        self.auction.bid(&mut self.ledger, bidder, units, payment)
    }

    pub fn claim(&mut self, bidder: &AccountId) -> AuctionResult<ClaimReceipt> {
        self.auction.claim(&mut self.ledger, bidder)
    }

    pub fn payment_of(&self, account: &AccountId) -> Amount {
        self.ledger.balance_of(Asset::Payment, account)
    }

    pub fn tokens_of(&self, account: &AccountId) -> Amount {
        self.ledger.balance_of(Asset::SaleToken, account)
    }

    /// Payment value is only ever moved, never created or destroyed.
    pub fn assert_payment_conserved(&self) {
        assert_eq!(self.ledger.circulating(Asset::Payment), 4 * BIDDER_FUNDS);
    }

    /// Every sale token is held by someone or burned.
    pub fn assert_tokens_conserved(&self) {
        assert_eq!(
            self.ledger.circulating(Asset::SaleToken) + self.ledger.burned(Asset::SaleToken),
            Amount::from(SUPPLY)
        );
    }
}

/// A ledger whose recipient calls back into the engine when paid.
///
/// Models a payout to a contract with a receive hook: after each transfer
/// to `attacker`, it re-enters the auction with `reentry`, up to
/// `remaining` times, and records what the engine answered.
pub struct ReentrantLedger {
    pub inner: InMemoryLedger,
    auction: Rc<DutchAuction<ManualClock>>,
    attacker: AccountId,
    reentry: Command,
    remaining: u32,
    pub attempts: Vec<AuctionResult<Outcome>>,
}

impl ReentrantLedger {
    pub fn new(
        inner: InMemoryLedger,
        auction: Rc<DutchAuction<ManualClock>>,
        attacker: AccountId,
        reentry: Command,
        remaining: u32,
    ) -> Self {
        Self {
            inner,
            auction,
            attacker,
            reentry,
            remaining,
            attempts: Vec::new(),
        }
    }
}

impl ValueLedger for ReentrantLedger {
    fn escrow_check(&self, units: Units) -> bool {
        self.inner.escrow_check(units)
    }

    fn collect(&mut self, from: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.inner.collect(from, amount)
    }

    fn transfer_out(&mut self, asset: Asset, to: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.inner.transfer_out(asset, to, amount)?;

        if *to == self.attacker && self.remaining > 0 {
            self.remaining -= 1;
            let auction = Rc::clone(&self.auction);
            let attacker = self.attacker;
            let command = self.reentry.clone();
            let result = auction.execute(&mut *self, &attacker, &command);
            self.attempts.push(result);
        }
        Ok(())
    }

    fn burn(&mut self, asset: Asset, amount: Amount) -> LedgerResult<()> {
        self.inner.burn(asset, amount)
    }

    fn checkpoint(&mut self) -> LedgerCheckpoint {
        self.inner.checkpoint()
    }

    fn commit(&mut self, checkpoint: LedgerCheckpoint) {
        self.inner.commit(checkpoint)
    }

    fn rollback(&mut self, checkpoint: LedgerCheckpoint) {
        self.inner.rollback(checkpoint)
    }
}
