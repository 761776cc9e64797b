//! # Error Types
//!
//! Protocol-level errors raised while parsing identifiers and decoding
//! wire envelopes.

use thiserror::Error;

/// Errors raised by identifier parsing and envelope codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Service pair key does not split into exactly two non-empty halves.
    #[error("invalid service pair: {0}")]
    InvalidServicePair(String),

    /// Full service ID is not `bxh:chain:service`.
    #[error("invalid full service id: {0}")]
    InvalidServiceId(String),

    /// Chaincode key is not `channel&name`.
    #[error("invalid chaincode key: {0}")]
    InvalidChaincodeKey(String),

    /// IBTP type code outside the known set.
    #[error("unknown IBTP type code: {0}")]
    UnknownIbtpType(u64),

    /// Transaction status code outside the known set.
    #[error("unknown transaction status code: {0}")]
    UnknownTransactionStatus(u64),

    /// Binary or JSON encoding failed.
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<bincode::Error> for ProtocolError {
    fn from(err: bincode::Error) -> Self {
        ProtocolError::Codec(err.to_string())
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Codec(err.to_string())
    }
}
