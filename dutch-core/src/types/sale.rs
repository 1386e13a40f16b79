//! Sale parameters and lifecycle stage.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::asset::{Amount, Units};
use crate::error::ParameterError;

/// Immutable parameters of a descending-price sale.
///
/// The unit price starts at `starting_price`, falls by `decay_per_second`
/// every second after the sale opens, and never drops below `reserved_price`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleParameters {
    /// Unit price at the instant the sale opens.
    pub starting_price: Amount,

    /// Price floor. Always `<= starting_price`.
    pub reserved_price: Amount,

    /// Linear price decrease per elapsed second.
    pub decay_per_second: Amount,

    /// Units for sale, escrowed in full before the sale opens.
    pub total_supply: Units,
}

impl SaleParameters {
    /// Create validated sale parameters.
    pub fn new(
        starting_price: Amount,
        reserved_price: Amount,
        decay_per_second: Amount,
        total_supply: Units,
    ) -> Result<Self, ParameterError> {
        if reserved_price > starting_price {
            return Err(ParameterError::ReservedAboveStarting {
                reserved: reserved_price,
                starting: starting_price,
            });
        }
        if total_supply == 0 {
            return Err(ParameterError::ZeroSupply);
        }

        Ok(Self {
            starting_price,
            reserved_price,
            decay_per_second,
            total_supply,
        })
    }

    /// Re-check the invariants, e.g. after decoding from bytes.
    pub fn validate(&self) -> Result<(), ParameterError> {
        Self::new(
            self.starting_price,
            self.reserved_price,
            self.decay_per_second,
            self.total_supply,
        )
        .map(|_| ())
    }
}

/// Lifecycle stage of the auction.
///
/// `Pending -> Open` happens once on start; `Open -> Closed` happens once on
/// sellout or deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Created and funded, not yet started.
    #[default]
    Pending,
    /// Accepting bids.
    Open,
    /// Clearing price fixed; bidders may claim.
    Closed,
}

impl Stage {
    /// Stable numeric code (0, 1, 2) as exposed to front ends.
    pub fn code(&self) -> u8 {
        match self {
            Stage::Pending => 0,
            Stage::Open => 1,
            Stage::Closed => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Pending => write!(f, "pending"),
            Stage::Open => write!(f, "open"),
            Stage::Closed => write!(f, "closed"),
        }
    }
}
