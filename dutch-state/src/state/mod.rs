//! State container and access traits.
//!
//! This module provides:
//! - [`AuctionReader`]: Read-only access to auction state
//! - [`AuctionWriter`]: Mutable access to auction state
//! - [`AuctionState`]: In-memory, serializable implementation

mod store;
mod auction_state;

pub use store::{AuctionReader, AuctionWriter};
pub use auction_state::AuctionState;
