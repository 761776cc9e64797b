//! # Domain Errors

use shared_types::{ChaincodeResponse, ProtocolError};
use thiserror::Error;

/// Relay client error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The chaincode answered with an error status.
    #[error("Chaincode status Code: ({status}) - {message}")]
    ChaincodeStatus {
        /// Status code of the response.
        status: i32,
        /// Message carried by the response.
        message: String,
    },

    /// The ledger could not be reached or failed internally.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// No committed transaction with this ID.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// A shutdown interrupted the operation.
    #[error("operation cancelled by shutdown")]
    Cancelled,

    /// The downstream IBTP channel is closed.
    #[error("delivery channel closed")]
    DeliveryClosed,

    /// `getChainId` did not return `bxh-appchain`.
    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    /// Receipts carrying more than one result.
    #[error("multi IBTP is not supported yet")]
    MultiIbtpUnsupported,

    /// Payload that is not the expected JSON.
    #[error("unmarshal {what}: {message}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Decoder message.
        message: String,
    },

    /// Wire or identifier error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// Whether this error is an application-level failure that retrying
    /// cannot fix.
    ///
    /// Only the generic chaincode error status qualifies; every other
    /// failure is treated as transient.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::ChaincodeStatus { status, .. } if *status == ChaincodeResponse::ERROR)
    }

    /// Whether the broker reported that the requested message row does
    /// not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChaincodeStatus { status, .. } if *status == ChaincodeResponse::NOT_FOUND
        )
    }

    pub(crate) fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            message: err.to_string(),
        }
    }
}

/// Multi-signature verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiSignError {
    /// The hash is not 32 bytes of hex.
    #[error("hash parse error: {0}")]
    InvalidHash(String),

    /// A 65-byte signature did not yield a public key.
    #[error("recover plain error")]
    RecoveryFailed,
}
