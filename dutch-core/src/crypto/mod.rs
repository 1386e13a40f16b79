//! Hashing and account derivation.
//!
//! This module provides:
//! - SHA-256 hashing
//! - Account identifier derivation from human-readable labels

mod address;
mod hashing;

pub use address::{derive_account, short_hex, ACCOUNT_DOMAIN};
pub use hashing::{sha256, sha256_concat, to_hex};
