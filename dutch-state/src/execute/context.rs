//! Execution context for auction operations.

/// Default bidding window (20 minutes), as in the reference deployment.
pub const DEFAULT_SALE_DURATION: u64 = 1_200;

/// Per-call context.
///
/// Captured once at the start of an operation, so every check within that
/// operation sees the same instant.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    /// Current time (unix seconds).
    pub timestamp: u64,

    /// Length of the bidding window from start to deadline.
    pub sale_duration: u64,
}

impl ExecutionContext {
    /// Create a new execution context.
    pub fn new(timestamp: u64, sale_duration: u64) -> Self {
        Self {
            timestamp,
            sale_duration,
        }
    }

    /// Create an execution context with the default sale duration.
    pub fn with_timestamp(timestamp: u64) -> Self {
        Self::new(timestamp, DEFAULT_SALE_DURATION)
    }

    /// Create an execution context for testing.
    #[cfg(test)]
    pub fn test_context() -> Self {
        Self::with_timestamp(1_700_000_000)
    }
}
