//! In-memory auction state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dutch_core::{AccountId, Amount, BidderAccount, SaleParameters, Stage, Units};

use super::store::{AuctionReader, AuctionWriter};

/// Complete auction state: stage, timing, totals, and the bidder ledger.
///
/// Accounts live in a `BTreeMap` so that serialized snapshots are
/// byte-for-byte deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    /// Immutable sale parameters.
    pub parameters: SaleParameters,

    /// Account allowed to start the sale.
    pub administrator: AccountId,

    /// Lifecycle stage.
    pub stage: Stage,

    /// Set on start.
    pub start_time: Option<u64>,

    /// `start_time + sale_duration`, set on start.
    pub close_time: Option<u64>,

    /// Set when the stage moves to `Closed`.
    pub closed_at: Option<u64>,

    /// Units sold so far.
    pub total_allocated: Units,

    /// Set exactly once, at closing.
    pub clearing_price: Option<Amount>,

    /// Unsold units destroyed at closing.
    pub unsold_burned: Units,

    /// Per-bidder accounting.
    pub accounts: BTreeMap<AccountId, BidderAccount>,
}

impl AuctionState {
    /// Create a pending auction.
    pub fn new(parameters: SaleParameters, administrator: AccountId) -> Self {
        Self {
            parameters,
            administrator,
            stage: Stage::Pending,
            start_time: None,
            close_time: None,
            closed_at: None,
            total_allocated: 0,
            clearing_price: None,
            unsold_burned: 0,
            accounts: BTreeMap::new(),
        }
    }

    /// Sum of allocated units over all accounts, `None` on overflow.
    pub fn sum_allocated(&self) -> Option<Units> {
        self.accounts
            .values()
            .try_fold(0 as Units, |sum, a| sum.checked_add(a.allocated_units))
    }

    /// Check the structural invariants that must hold between operations.
    pub fn invariants_hold(&self) -> bool {
        let allocation_consistent = self.total_allocated <= self.parameters.total_supply
            && self.sum_allocated() == Some(self.total_allocated);

        let stage_consistent = match self.stage {
            Stage::Pending => self.start_time.is_none() && self.clearing_price.is_none(),
            Stage::Open => self.start_time.is_some() && self.clearing_price.is_none(),
            Stage::Closed => {
                self.clearing_price
                    .map_or(false, |p| p >= self.parameters.reserved_price)
                    && self.closed_at.is_some()
                    && self.unsold_burned.checked_add(self.total_allocated)
                        == Some(self.parameters.total_supply)
            }
        };

        allocation_consistent && stage_consistent
    }

    /// Iterate over all bidder accounts.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &BidderAccount)> {
        self.accounts.iter()
    }
}

impl AuctionReader for AuctionState {
    fn parameters(&self) -> &SaleParameters {
        &self.parameters
    }

    fn administrator(&self) -> AccountId {
        self.administrator
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    fn close_time(&self) -> Option<u64> {
        self.close_time
    }

    fn closed_at(&self) -> Option<u64> {
        self.closed_at
    }

    fn total_allocated(&self) -> Units {
        self.total_allocated
    }

    fn clearing_price(&self) -> Option<Amount> {
        self.clearing_price
    }

    fn unsold_burned(&self) -> Units {
        self.unsold_burned
    }

    fn account(&self, bidder: &AccountId) -> Option<&BidderAccount> {
        self.accounts.get(bidder)
    }

    fn bidder_count(&self) -> usize {
        self.accounts.len()
    }
}

impl AuctionWriter for AuctionState {
    fn open(&mut self, start_time: u64, close_time: u64) {
        self.stage = Stage::Open;
        self.start_time = Some(start_time);
        self.close_time = Some(close_time);
    }

    fn set_total_allocated(&mut self, units: Units) {
        self.total_allocated = units;
    }

    fn get_or_create_account(&mut self, bidder: &AccountId) -> &mut BidderAccount {
        self.accounts.entry(*bidder).or_default()
    }

    fn update_account<F>(&mut self, bidder: &AccountId, f: F)
    where
        F: FnOnce(&mut BidderAccount),
    {
        if let Some(account) = self.accounts.get_mut(bidder) {
            f(account);
        }
    }

    fn close(&mut self, closed_at: u64, clearing_price: Amount, unsold_burned: Units) {
        self.stage = Stage::Closed;
        self.closed_at = Some(closed_at);
        self.clearing_price = Some(clearing_price);
        self.unsold_burned = unsold_burned;
    }
}
