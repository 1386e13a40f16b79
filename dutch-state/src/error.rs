//! Error types for auction operations.

use thiserror::Error;

use dutch_core::{short_hex, AccountId, Amount, Asset, Operation, ParameterError, SerializationError, Stage};

/// Broad classification of an [`AuctionError`].
///
/// Callers that only care about "what kind of refusal was this" match on the
/// kind; the error variants carry the details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the role the operation requires.
    Unauthorized,
    /// Operation is not valid in the current stage or at the current time.
    WrongStage,
    /// Zero or otherwise malformed quantities.
    InvalidInput,
    /// Payment attached to a bid is below its cost.
    InsufficientPayment,
    /// Supply not escrowed before start.
    InsufficientFunding,
    /// The value ledger refused a transfer or burn.
    LedgerFailure,
    /// Nested entry while another operation is executing.
    Reentrant,
    /// An amount does not fit the arithmetic domain.
    Overflow,
}

/// All validation and execution errors for auction operations.
///
/// Every error leaves the engine exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// Only the administrator may start the sale.
    #[error("unauthorized caller {}: expected administrator {}", short_hex(.caller), short_hex(.expected))]
    Unauthorized {
        expected: AccountId,
        caller: AccountId,
    },

    /// The operation is not allowed in this stage.
    #[error("{operation} not allowed while auction is {stage}")]
    WrongStage { operation: Operation, stage: Stage },

    /// A bid arrived at or after the deadline.
    #[error("bid at {now} rejected: sale closed for bids at {close_time}")]
    SaleExpired { close_time: u64, now: u64 },

    /// A claim arrived while the sale is still running.
    #[error("claim at {now} rejected: sale runs until {close_time}")]
    SaleStillRunning { close_time: u64, now: u64 },

    /// Requested units must be greater than zero.
    #[error("requested units must be greater than zero")]
    ZeroUnits,

    /// Payment attached to a bid does not cover its cost.
    #[error("insufficient payment: cost {required}, provided {provided}")]
    InsufficientPayment { required: Amount, provided: Amount },

    /// The engine is not entitled to the full supply.
    #[error("supply of {required} units is not escrowed to the auction")]
    InsufficientFunding { required: u64 },

    /// The clearing price was already fixed.
    #[error("clearing price already fixed at {price}")]
    ClearingAlreadyFixed { price: Amount },

    /// Nested entry rejected by the execution guard.
    #[error("reentrant {operation} rejected while another operation is executing")]
    Reentrant { operation: Operation },

    /// Arithmetic overflow in a price or amount calculation.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// The value ledger refused an instruction.
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

impl AuctionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AuctionError::WrongStage { .. }
            | AuctionError::SaleExpired { .. }
            | AuctionError::SaleStillRunning { .. }
            | AuctionError::ClearingAlreadyFixed { .. } => ErrorKind::WrongStage,
            AuctionError::ZeroUnits => ErrorKind::InvalidInput,
            AuctionError::InsufficientPayment { .. } => ErrorKind::InsufficientPayment,
            AuctionError::InsufficientFunding { .. } => ErrorKind::InsufficientFunding,
            AuctionError::Reentrant { .. } => ErrorKind::Reentrant,
            AuctionError::ArithmeticOverflow => ErrorKind::Overflow,
            AuctionError::Ledger(_) => ErrorKind::LedgerFailure,
        }
    }
}

/// Errors reported by a value ledger.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The source account does not hold enough of the asset.
    #[error("insufficient {asset} balance for {}: available {available}, requested {requested}", short_hex(.account))]
    InsufficientBalance {
        asset: Asset,
        account: AccountId,
        available: Amount,
        requested: Amount,
    },

    /// The recipient refused the transfer.
    #[error("recipient {} rejected {asset} transfer", short_hex(.account))]
    RecipientRejected { asset: Asset, account: AccountId },
}

/// Errors constructing or restoring an engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The bidding window must be at least one second.
    #[error("sale duration must be greater than zero")]
    ZeroSaleDuration,

    /// Sale parameters violate their invariants.
    #[error("invalid sale parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// A restored state fails its consistency checks.
    #[error("inconsistent auction snapshot")]
    InconsistentSnapshot,

    /// Snapshot bytes could not be decoded.
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] SerializationError),
}

/// Result type for auction operations.
pub type AuctionResult<T> = Result<T, AuctionError>;

/// Result type for ledger instructions.
pub type LedgerResult<T> = Result<T, LedgerError>;
