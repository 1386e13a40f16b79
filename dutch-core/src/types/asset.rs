//! Identifiers and quantities moved through the value ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 20-byte participant identifier.
pub type AccountId = [u8; 20];

/// Payment value and unit prices.
pub type Amount = u128;

/// Count of sale-token units.
pub type Units = u64;

/// The two fungible assets the engine instructs the ledger to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    /// The token being sold. Its full supply is escrowed before the sale opens.
    SaleToken,
    /// The native asset bidders pay with.
    Payment,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::SaleToken => write!(f, "sale-token"),
            Asset::Payment => write!(f, "payment"),
        }
    }
}
