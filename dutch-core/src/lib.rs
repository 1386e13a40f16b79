//! # Dutch Core
//!
//! Core types, identities, and serialization for the Dutch auction engine.
//!
//! This crate provides the foundation for the other workspace crates:
//! - Sale parameters, stages, bidder accounts, receipts and events
//! - Account id derivation (SHA-256 of a domain-separated label)
//! - Deterministic binary serialization for state snapshots

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod serialization;
pub mod types;

// Re-export commonly used types at crate root
pub use crypto::{derive_account, short_hex};
pub use error::{CoreError, ParameterError, SerializationError};
pub use types::{
    AccountId, Amount, Asset, Units,
    AuctionEvent, BidReceipt, BidderAccount, ClaimReceipt, Operation,
    SaleParameters, Stage,
};
