//! Error types for the dutch-core crate.

use std::fmt;

use crate::types::Amount;

/// Top-level error type for dutch-core operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Serialization or deserialization failed.
    Serialization(SerializationError),
    /// Sale parameters violate an invariant.
    Parameters(ParameterError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Serialization(e) => write!(f, "serialization error: {}", e),
            CoreError::Parameters(e) => write!(f, "parameter error: {}", e),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<SerializationError> for CoreError {
    fn from(e: SerializationError) -> Self {
        CoreError::Serialization(e)
    }
}

impl From<ParameterError> for CoreError {
    fn from(e: ParameterError) -> Self {
        CoreError::Parameters(e)
    }
}

/// Errors related to serialization and deserialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to encode data to bytes.
    EncodeFailed(String),
    /// Failed to decode data from bytes.
    DecodeFailed(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            SerializationError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Errors raised when constructing sale parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterError {
    /// The floor price is above the opening price.
    ReservedAboveStarting {
        /// Requested floor price.
        reserved: Amount,
        /// Requested opening price.
        starting: Amount,
    },
    /// Nothing to sell.
    ZeroSupply,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::ReservedAboveStarting { reserved, starting } => {
                write!(
                    f,
                    "reserved price {} exceeds starting price {}",
                    reserved, starting
                )
            }
            ParameterError::ZeroSupply => write!(f, "total supply must be greater than zero"),
        }
    }
}

impl std::error::Error for ParameterError {}
