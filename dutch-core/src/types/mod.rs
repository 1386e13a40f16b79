//! Core auction data types.
//!
//! This module contains the plain data shared by the engine and its callers:
//!
//! - Account ids, assets and amount aliases
//! - Sale parameters and the auction stage
//! - Per-bidder accounting entries
//! - Operation receipts and emitted events

mod asset;
mod bidder;
mod event;
mod receipt;
mod sale;

pub use asset::{AccountId, Amount, Asset, Units};
pub use bidder::BidderAccount;
pub use event::AuctionEvent;
pub use receipt::{BidReceipt, ClaimReceipt, Operation};
pub use sale::{SaleParameters, Stage};
