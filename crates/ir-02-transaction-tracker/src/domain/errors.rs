//! # Domain Errors

use ir_01_ledger_store::LedgerError;
use thiserror::Error;

/// Tracker error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// `startTransaction` on an id that already has a status.
    #[error("Transaction is recorded.")]
    AlreadyRecorded,

    /// Transition requires status begin.
    #[error("Transaction status is not begin.")]
    NotBegin,

    /// Transition requires status begin_rollback.
    #[error("Transaction status is not begin_rollback.")]
    NotBeginRollback,

    /// Stored status code is outside the known set.
    #[error("unknown transaction status code: {0}")]
    UnknownStatus(u64),

    /// Appchain registered twice.
    #[error("this appchain has already been registered")]
    AppchainExists,

    /// Appchain lookup for an unknown id.
    #[error("this appchain is not registered")]
    AppchainNotRegistered,

    /// Appchain exists but is not available.
    #[error("the appchain's status is not available")]
    AppchainUnavailable,

    /// Wrong argument count or format.
    #[error("{0}")]
    InvalidArguments(String),

    /// Ledger state access failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
