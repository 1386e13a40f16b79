//! Scenario replay against an in-memory deployment.

use std::collections::BTreeMap;

use anyhow::Context;

use dutch_core::{derive_account, AccountId, Amount, Asset, Stage, Units};
use dutch_state::{
    AuctionError, Clock, DutchAuction, InMemoryLedger, ManualClock, Outcome, ValueLedger,
};

use crate::config::SimConfig;
use crate::scenario::{Scenario, Step, ADMIN_LABEL, ENGINE_LABEL};

/// What happened when a step was replayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// The engine accepted the operation.
    Accepted(Outcome),
    /// The engine refused the operation; the run continues.
    Rejected(AuctionError),
    /// The clock moved to the given time.
    Advanced(u64),
}

/// One replayed step.
#[derive(Clone, Debug)]
pub struct StepRecord {
    /// Seconds since deployment when the step ran.
    pub offset: u64,
    /// The scripted step.
    pub step: Step,
    /// What the engine did with it.
    pub result: StepResult,
}

/// Per-bidder line of the final report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidderReport {
    /// Scenario label.
    pub label: String,
    /// Units won in the auction.
    pub allocated_units: Units,
    /// Payment retained by the engine at bid time.
    pub paid_total: Amount,
    /// Whether the allocation has been claimed.
    pub claimed: bool,
    /// Sale tokens held after the run.
    pub token_balance: Amount,
    /// Payment held after the run.
    pub payment_balance: Amount,
}

/// Final state of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Stage at the end of the run.
    pub stage: Stage,
    /// Uniform price, once closed.
    pub clearing_price: Option<Amount>,
    /// Units allocated to bidders.
    pub sold: Units,
    /// Sale tokens destroyed.
    pub burned: Amount,
    /// Sale tokens still held by the engine.
    pub custody_tokens: Amount,
    /// Payment still held by the engine.
    pub custody_payment: Amount,
    /// One line per scenario bidder.
    pub bidders: Vec<BidderReport>,
    /// Payment and sale-token totals match what was minted.
    pub conserved: bool,
}

/// A deployed auction with its ledger and participants.
pub struct Simulation {
    auction: DutchAuction<ManualClock>,
    ledger: InMemoryLedger,
    clock: ManualClock,
    genesis: u64,
    admin: AccountId,
    bidders: BTreeMap<String, AccountId>,
    minted_payment: Amount,
}

impl Simulation {
    /// Deploy the auction at `genesis`, escrow the supply and fund bidders.
    pub fn deploy(config: &SimConfig, scenario: &Scenario, genesis: u64) -> anyhow::Result<Self> {
        let admin = derive_account(ADMIN_LABEL);
        let engine = derive_account(ENGINE_LABEL);
        let clock = ManualClock::new(genesis);

        let auction = DutchAuction::new(
            config.parameters.clone(),
            admin,
            clock.clone(),
            config.auction.clone(),
        )
        .context("failed to create auction")?;

        // The administrator receives the supply and escrows all of it
        let supply = Amount::from(config.parameters.total_supply);
        let mut ledger = InMemoryLedger::new(engine);
        ledger.mint(Asset::SaleToken, &admin, supply);
        ledger
            .transfer(Asset::SaleToken, &admin, &engine, supply)
            .context("failed to escrow supply")?;

        let mut bidders = BTreeMap::new();
        let mut minted_payment: Amount = 0;
        for (label, funds) in &scenario.bidders {
            let account = derive_account(label);
            ledger.mint(Asset::Payment, &account, *funds);
            minted_payment = minted_payment
                .checked_add(*funds)
                .context("bidder funds overflow")?;
            bidders.insert(label.clone(), account);
        }

        tracing::info!(
            bidders = bidders.len(),
            supply = config.parameters.total_supply,
            escrowed = ledger.escrow_check(config.parameters.total_supply),
            "Deployment ready"
        );

        Ok(Self {
            auction,
            ledger,
            clock,
            genesis,
            admin,
            bidders,
            minted_payment,
        })
    }

    /// Replay every step in order.
    pub fn run(&mut self, steps: &[Step]) -> anyhow::Result<Vec<StepRecord>> {
        steps.iter().map(|step| self.apply(step)).collect()
    }

    /// Replay one step.
    ///
    /// Engine refusals are part of the result; only malformed steps fail.
    pub fn apply(&mut self, step: &Step) -> anyhow::Result<StepRecord> {
        let result = match step {
            Step::Advance { seconds } => StepResult::Advanced(self.clock.advance(*seconds)),
            Step::Start { caller } => {
                let caller = match caller {
                    Some(label) => self.account(label)?,
                    None => self.admin,
                };
                Self::record(self.auction.start(&mut self.ledger, &caller).map(|()| Outcome::Started))
            }
            Step::Bid { bidder, units, payment } => {
                let bidder = self.account(bidder)?;
                let payment = match payment {
                    Some(amount) => *amount,
                    None => self.exact_cost(*units),
                };
                Self::record(
                    self.auction
                        .bid(&mut self.ledger, &bidder, *units, payment)
                        .map(Outcome::Bid),
                )
            }
            Step::Claim { bidder } => {
                let bidder = self.account(bidder)?;
                Self::record(self.auction.claim(&mut self.ledger, &bidder).map(Outcome::Claimed))
            }
        };

        Ok(StepRecord {
            offset: self.offset(),
            step: step.clone(),
            result,
        })
    }

    fn record(result: Result<Outcome, AuctionError>) -> StepResult {
        match result {
            Ok(outcome) => StepResult::Accepted(outcome),
            Err(err) => StepResult::Rejected(err),
        }
    }

    fn account(&self, label: &str) -> anyhow::Result<AccountId> {
        self.bidders
            .get(label)
            .copied()
            .with_context(|| format!("unknown bidder {:?}", label))
    }

    /// Cost of `units` at the current price, as a front end would quote it.
    /// Zero when no price is available; the engine then reports why.
    fn exact_cost(&self, units: Units) -> Amount {
        let remaining = self.auction.remaining_supply();
        self.auction
            .current_price()
            .map(|price| price.saturating_mul(Amount::from(units.min(remaining))))
            .unwrap_or(0)
    }

    /// Seconds since deployment.
    pub fn offset(&self) -> u64 {
        self.clock.now().saturating_sub(self.genesis)
    }

    /// The engine.
    pub fn auction(&self) -> &DutchAuction<ManualClock> {
        &self.auction
    }

    /// The ledger.
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// Summarize balances and check that no value was created or lost.
    pub fn report(&self) -> Report {
        let supply = Amount::from(self.auction.total_supply());
        let burned = self.ledger.burned(Asset::SaleToken);

        let bidders = self
            .bidders
            .iter()
            .map(|(label, account)| {
                let entry = self.auction.account_of(account);
                BidderReport {
                    label: label.clone(),
                    allocated_units: entry.allocated_units,
                    paid_total: entry.paid_total,
                    claimed: entry.claimed,
                    token_balance: self.ledger.balance_of(Asset::SaleToken, account),
                    payment_balance: self.ledger.balance_of(Asset::Payment, account),
                }
            })
            .collect();

        let conserved = self.ledger.circulating(Asset::Payment) == self.minted_payment
            && self.ledger.circulating(Asset::SaleToken) + burned == supply
            && self.auction.snapshot().invariants_hold();

        Report {
            stage: self.auction.stage(),
            clearing_price: self.auction.clearing_price().ok(),
            sold: self.auction.total_allocated(),
            burned,
            custody_tokens: self.ledger.custody_balance(Asset::SaleToken),
            custody_payment: self.ledger.custody_balance(Asset::Payment),
            bidders,
            conserved,
        }
    }

    /// Write the engine snapshot to `path`.
    pub fn write_snapshot(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let bytes = self.auction.snapshot_bytes().context("failed to encode snapshot")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), "Snapshot written");
        Ok(())
    }
}
