//! State machine for a descending-price (Dutch) token sale.
//!
//! The sale admits bids against a falling unit price, allocates a fixed
//! supply until it sells out or a deadline passes, and then settles every
//! bidder at one uniform clearing price. All value moves through a
//! caller-supplied [`ValueLedger`]; the engine itself holds no balances.
//!
//! # Key Components
//!
//! - [`DutchAuction`]: the engine, with `start`, `bid` and `claim`
//! - [`price_at`]: the pricing function
//! - [`AuctionState`] / [`AuctionReader`] / [`AuctionWriter`]: state and access traits
//! - [`ValueLedger`] / [`InMemoryLedger`]: the custody seam and a reference ledger
//! - [`AuctionError`]: validation and execution failures
//!
//! # Example
//!
//! ```ignore
//! use dutch_state::{AuctionConfig, DutchAuction, InMemoryLedger, SystemClock};
//!
//! let auction = DutchAuction::new(params, admin, SystemClock, AuctionConfig::default())?;
//! auction.start(&mut ledger, &admin)?;
//! let receipt = auction.bid(&mut ledger, &alice, 500, 1_000_000)?;
//! ```

mod clock;
mod engine;
mod error;
mod execute;
mod ledger;
mod pricing;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{AuctionConfig, Command, DutchAuction, ExecutionGuard, Outcome};
pub use error::{AuctionError, AuctionResult, ErrorKind, LedgerError, LedgerResult, SetupError};
pub use execute::{
    execute_bid, execute_claim, execute_start, fix_clearing, settle_account, Effects,
    ExecutionContext, Settlement, DEFAULT_SALE_DURATION,
};
pub use ledger::{InMemoryLedger, LedgerCheckpoint, LedgerOp, ValueLedger};
pub use pricing::{floor_reached_at, price_at};
pub use state::{AuctionReader, AuctionState, AuctionWriter};
