//! Account identifier derivation.
//!
//! Participants are identified by 20-byte account ids. Tools and tests derive
//! them from labels ("alice", "deployer") so that scenarios stay readable
//! while the engine only ever sees opaque ids.

use super::hashing::{sha256_concat, to_hex};
use crate::types::AccountId;

/// Domain separator mixed into every derived account id.
pub const ACCOUNT_DOMAIN: &[u8] = b"dutch-auction/account/v1:";

/// Derive an account id from a label.
///
/// The id is the first 20 bytes of SHA-256(domain || label).
pub fn derive_account(label: &str) -> AccountId {
    let hash = sha256_concat(&[ACCOUNT_DOMAIN, label.as_bytes()]);
    let mut account = [0u8; 20];
    account.copy_from_slice(&hash[..20]);
    account
}

/// Render the first four bytes of an account id as hex, for log lines.
pub fn short_hex(account: &AccountId) -> String {
    to_hex(&account[..4])
}
