//! The auction engine.
//!
//! [`DutchAuction`] ties the effect handlers, the clock and a caller-supplied
//! [`ValueLedger`] together. Every public operation runs as one unit:
//!
//! 1. Reject nested entry if the execution guard is on
//! 2. Snapshot the state and mark the event log
//! 3. Run the handler (all state mutation happens here)
//! 4. Open a ledger checkpoint and issue the handler's instructions in order
//! 5. Commit, or roll back ledger, state and events together
//!
//! The engine is used through `&self` so that a ledger which hands control
//! to a recipient can let that recipient call back in through a shared
//! handle. Such a nested call observes fully updated state.

mod command;
mod config;
mod guard;

pub use command::{Command, Outcome};
pub use config::AuctionConfig;
pub use guard::ExecutionGuard;

use std::cell::{Cell, RefCell};

use dutch_core::serialization::{deserialize, serialize};
use dutch_core::crypto::sha256;
use dutch_core::{
    short_hex, AccountId, Amount, AuctionEvent, BidReceipt, BidderAccount, ClaimReceipt,
    Operation, SaleParameters, SerializationError, Stage, Units,
};

use crate::clock::Clock;
use crate::error::{AuctionError, AuctionResult, SetupError};
use crate::execute::{execute_bid, execute_claim, execute_start, Effects, ExecutionContext};
use crate::ledger::ValueLedger;
use crate::pricing::price_at;
use crate::state::{AuctionReader, AuctionState};
use guard::GuardToken;

/// A descending-price sale.
pub struct DutchAuction<C: Clock> {
    state: RefCell<AuctionState>,
    guard: Cell<ExecutionGuard>,
    events: RefCell<Vec<AuctionEvent>>,
    clock: C,
    config: AuctionConfig,
}

impl<C: Clock> DutchAuction<C> {
    /// Create a pending auction.
    ///
    /// The supply is not checked here; `start` requires it to be escrowed.
    pub fn new(
        parameters: SaleParameters,
        administrator: AccountId,
        clock: C,
        config: AuctionConfig,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        parameters.validate()?;

        tracing::info!(
            administrator = %short_hex(&administrator),
            starting_price = parameters.starting_price,
            reserved_price = parameters.reserved_price,
            decay_per_second = parameters.decay_per_second,
            total_supply = parameters.total_supply,
            sale_duration = config.sale_duration,
            "Auction created"
        );

        Ok(Self::from_parts(AuctionState::new(parameters, administrator), clock, config))
    }

    /// Resume from a previously taken snapshot.
    pub fn restore(state: AuctionState, clock: C, config: AuctionConfig) -> Result<Self, SetupError> {
        config.validate()?;
        state.parameters.validate()?;
        if !state.invariants_hold() {
            return Err(SetupError::InconsistentSnapshot);
        }
        Ok(Self::from_parts(state, clock, config))
    }

    /// Resume from bytes produced by [`DutchAuction::snapshot_bytes`].
    pub fn from_snapshot_bytes(bytes: &[u8], clock: C, config: AuctionConfig) -> Result<Self, SetupError> {
        let state: AuctionState = deserialize(bytes)?;
        Self::restore(state, clock, config)
    }

    fn from_parts(state: AuctionState, clock: C, config: AuctionConfig) -> Self {
        Self {
            state: RefCell::new(state),
            guard: Cell::new(ExecutionGuard::Idle),
            events: RefCell::new(Vec::new()),
            clock,
            config,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Open the sale. Administrator only, once, with the supply escrowed.
    pub fn start(&self, ledger: &mut dyn ValueLedger, caller: &AccountId) -> AuctionResult<()> {
        self.run(Operation::Start, ledger, |state, ctx, ledger| {
            let escrowed = ledger.escrow_check(state.parameters().total_supply);
            execute_start(state, ctx, caller, escrowed)
        })
    }

    /// Reserve up to `requested_units` at the current price, paying `payment`.
    pub fn bid(
        &self,
        ledger: &mut dyn ValueLedger,
        caller: &AccountId,
        requested_units: Units,
        payment: Amount,
    ) -> AuctionResult<BidReceipt> {
        self.run(Operation::Bid, ledger, |state, ctx, _| {
            execute_bid(state, ctx, caller, requested_units, payment)
        })
    }

    /// Collect allocated units and any refund once the sale has closed.
    pub fn claim(&self, ledger: &mut dyn ValueLedger, caller: &AccountId) -> AuctionResult<ClaimReceipt> {
        self.run(Operation::Claim, ledger, |state, ctx, _| {
            execute_claim(state, ctx, caller)
        })
    }

    /// Dispatch a [`Command`].
    pub fn execute(
        &self,
        ledger: &mut dyn ValueLedger,
        caller: &AccountId,
        command: &Command,
    ) -> AuctionResult<Outcome> {
        match command {
            Command::Start => self.start(ledger, caller).map(|()| Outcome::Started),
            Command::Bid {
                requested_units,
                payment,
            } => self
                .bid(ledger, caller, *requested_units, *payment)
                .map(Outcome::Bid),
            Command::Claim => self.claim(ledger, caller).map(Outcome::Claimed),
        }
    }

    fn run<T>(
        &self,
        operation: Operation,
        ledger: &mut dyn ValueLedger,
        handler: impl FnOnce(&mut AuctionState, &ExecutionContext, &dyn ValueLedger) -> AuctionResult<Effects<T>>,
    ) -> AuctionResult<T> {
        if self.config.reentrancy_guard {
            if let ExecutionGuard::Executing(active) = self.guard.get() {
                tracing::warn!(%operation, %active, "Reentrant call rejected");
                return Err(AuctionError::Reentrant { operation });
            }
        }
        let _token = GuardToken::acquire(&self.guard, operation);

        let ctx = ExecutionContext::new(self.clock.now(), self.config.sale_duration);
        let snapshot = self.state.borrow().clone();
        let event_mark = self.events.borrow().len();

        // The state borrow must end before the first ledger call, which may
        // re-enter the engine.
        let effects = {
            let mut state = self.state.borrow_mut();
            match handler(&mut *state, &ctx, &*ledger) {
                Ok(effects) => effects,
                Err(err) => {
                    *state = snapshot;
                    tracing::debug!(%operation, error = %err, "Operation rejected");
                    return Err(err);
                }
            }
        };

        self.events.borrow_mut().extend(effects.events);

        let checkpoint = ledger.checkpoint();
        for op in &effects.ops {
            if let Err(err) = ledger.apply(op) {
                ledger.rollback(checkpoint);
                *self.state.borrow_mut() = snapshot;
                self.events.borrow_mut().truncate(event_mark);
                tracing::warn!(%operation, error = %err, "Ledger instruction failed, operation rolled back");
                return Err(err.into());
            }
        }
        ledger.commit(checkpoint);

        Ok(effects.outcome)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Recorded lifecycle stage.
    pub fn stage(&self) -> Stage {
        self.state.borrow().stage()
    }

    /// Stage as seen by a front end: an open sale past its deadline reads
    /// as `Closed` even before a claim has performed the closing.
    pub fn effective_stage(&self) -> Stage {
        let state = self.state.borrow();
        match (state.stage(), state.close_time()) {
            (Stage::Open, Some(close)) if self.clock.now() >= close => Stage::Closed,
            (stage, _) => stage,
        }
    }

    /// When the sale opened.
    pub fn start_time(&self) -> Option<u64> {
        self.state.borrow().start_time()
    }

    /// The bidding deadline.
    pub fn close_time(&self) -> Option<u64> {
        self.state.borrow().close_time()
    }

    /// When the sale closed.
    pub fn closed_at(&self) -> Option<u64> {
        self.state.borrow().closed_at()
    }

    /// Seconds until the deadline, or `None` before the sale starts.
    pub fn time_remaining(&self) -> Option<u64> {
        self.close_time()
            .map(|close| close.saturating_sub(self.clock.now()))
    }

    /// Units for sale.
    pub fn total_supply(&self) -> Units {
        self.state.borrow().parameters().total_supply
    }

    /// Units sold.
    pub fn total_allocated(&self) -> Units {
        self.state.borrow().total_allocated()
    }

    /// Units still available.
    pub fn remaining_supply(&self) -> Units {
        self.state.borrow().remaining_supply()
    }

    /// Unit price right now. Only valid while the sale is open.
    pub fn current_price(&self) -> AuctionResult<Amount> {
        let state = self.state.borrow();
        match (state.stage(), state.start_time()) {
            (Stage::Open, Some(start)) => Ok(price_at(state.parameters(), start, self.clock.now())),
            (stage, _) => Err(AuctionError::WrongStage {
                operation: Operation::PriceQuery,
                stage,
            }),
        }
    }

    /// The uniform settlement price. Only valid once closed.
    pub fn clearing_price(&self) -> AuctionResult<Amount> {
        let state = self.state.borrow();
        state.clearing_price().ok_or(AuctionError::WrongStage {
            operation: Operation::PriceQuery,
            stage: state.stage(),
        })
    }

    /// A bidder's account; all zeros for someone who never bid.
    pub fn account_of(&self, bidder: &AccountId) -> BidderAccount {
        self.state.borrow().account(bidder).cloned().unwrap_or_default()
    }

    /// Sale parameters.
    pub fn parameters(&self) -> SaleParameters {
        self.state.borrow().parameters().clone()
    }

    /// The administrator.
    pub fn administrator(&self) -> AccountId {
        self.state.borrow().administrator()
    }

    /// Engine configuration.
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// The clock the engine reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// True while an operation is executing.
    pub fn is_executing(&self) -> bool {
        self.guard.get().is_executing()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<AuctionEvent> {
        self.events.borrow().clone()
    }

    /// Drain the event log.
    pub fn take_events(&self) -> Vec<AuctionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Copy of the full state.
    pub fn snapshot(&self) -> AuctionState {
        self.state.borrow().clone()
    }

    /// Deterministic encoding of the full state.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        serialize(&*self.state.borrow())
    }

    /// SHA-256 of [`DutchAuction::snapshot_bytes`].
    pub fn snapshot_digest(&self) -> Result<[u8; 32], SerializationError> {
        Ok(sha256(&self.snapshot_bytes()?))
    }
}
