//! Auction state access traits.
//!
//! Effect handlers are written against these traits rather than the concrete
//! container, so they can be exercised on any backing store.

use dutch_core::{AccountId, Amount, BidderAccount, SaleParameters, Stage, Units};

/// Read access to auction state.
pub trait AuctionReader {
    /// Immutable sale parameters.
    fn parameters(&self) -> &SaleParameters;

    /// The only account allowed to start the sale.
    fn administrator(&self) -> AccountId;

    /// Current lifecycle stage.
    fn stage(&self) -> Stage;

    /// When the sale opened, if it has.
    fn start_time(&self) -> Option<u64>;

    /// Bidding deadline, if the sale has opened.
    fn close_time(&self) -> Option<u64>;

    /// When the sale actually closed (sellout or deadline detection).
    fn closed_at(&self) -> Option<u64>;

    /// Units sold so far.
    fn total_allocated(&self) -> Units;

    /// Uniform settlement price, fixed at closing.
    fn clearing_price(&self) -> Option<Amount>;

    /// Units burned at closing.
    fn unsold_burned(&self) -> Units;

    /// A bidder's account, if they ever bid.
    fn account(&self, bidder: &AccountId) -> Option<&BidderAccount>;

    /// Number of accounts ever created.
    fn bidder_count(&self) -> usize;

    /// Units still available.
    fn remaining_supply(&self) -> Units {
        self.parameters().total_supply.saturating_sub(self.total_allocated())
    }
}

/// Mutable access to auction state.
pub trait AuctionWriter: AuctionReader {
    /// Move to `Open` with the given timing.
    fn open(&mut self, start_time: u64, close_time: u64);

    /// Set the running allocation total.
    fn set_total_allocated(&mut self, units: Units);

    /// Get or lazily create a bidder account.
    fn get_or_create_account(&mut self, bidder: &AccountId) -> &mut BidderAccount;

    /// Update an existing bidder account.
    fn update_account<F>(&mut self, bidder: &AccountId, f: F)
    where
        F: FnOnce(&mut BidderAccount);

    /// Move to `Closed`, recording the clearing price and disposal.
    fn close(&mut self, closed_at: u64, clearing_price: Amount, unsold_burned: Units);
}
