//! # Domain Errors
//!
//! Error types for the key-value layer and the chaincode host.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Underlying error text
        message: String,
    },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// Underlying error text
        message: String,
    },

    /// Key not found.
    #[error("Key not found in KV store")]
    NotFound,
}

/// Chaincode host errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Chaincode answered with an error status; nothing was committed.
    #[error("Chaincode status Code: ({status}) - {message}")]
    ChaincodeStatus {
        /// Response status
        status: i32,
        /// Response message
        message: String,
    },

    /// No chaincode deployed under this name.
    #[error("Chaincode not found: {0}")]
    ChaincodeNotFound(String),

    /// A chaincode with this name is already deployed.
    #[error("Chaincode already deployed: {0}")]
    ChaincodeExists(String),

    /// No committed transaction with this ID.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored value could not be decoded.
    #[error("Corrupted state at {key}: {message}")]
    CorruptedState {
        /// State key
        key: String,
        /// Decode failure
        message: String,
    },

    /// Counter cannot advance past `u64::MAX`.
    #[error("Counter overflow at {0}")]
    CounterOverflow(String),

    /// Underlying store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),
}
