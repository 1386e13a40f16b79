//! Engine configuration.

use crate::error::SetupError;
use crate::execute::DEFAULT_SALE_DURATION;

/// Engine tunables that are not part of the sale parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionConfig {
    /// Seconds from start to the bidding deadline.
    pub sale_duration: u64,

    /// Reject nested entry while an operation is executing.
    pub reentrancy_guard: bool,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            sale_duration: DEFAULT_SALE_DURATION,
            reentrancy_guard: true,
        }
    }
}

impl AuctionConfig {
    /// Set the bidding window.
    pub fn with_sale_duration(mut self, seconds: u64) -> Self {
        self.sale_duration = seconds;
        self
    }

    /// Enable or disable the execution guard.
    ///
    /// Without the guard, nested calls run and rely on the handlers having
    /// finished their bookkeeping before any transfer.
    pub fn with_reentrancy_guard(mut self, enabled: bool) -> Self {
        self.reentrancy_guard = enabled;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.sale_duration == 0 {
            return Err(SetupError::ZeroSaleDuration);
        }
        Ok(())
    }
}
