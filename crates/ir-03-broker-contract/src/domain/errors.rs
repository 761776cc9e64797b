//! # Domain Errors
//!
//! Messages are part of the ledger interface: the relay hub and operators
//! read them back from failed responses.

use ir_01_ledger_store::LedgerError;
use shared_types::ProtocolError;
use thiserror::Error;

/// Broker error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// Admin-gated function called by a non-admin identity.
    #[error("Not allowed to invoke interchain function by non-admin client")]
    NotAdmin,

    /// Whitelist-gated function called from an unregistered chaincode.
    #[error("Not allowed to invoke interchain function by unregister chaincode")]
    NotWhitelisted,

    /// Wrong argument count or unparsable argument.
    #[error("{0}")]
    InvalidArguments(String),

    /// Ordering check failed for a counter family.
    #[error("{family}:incorrect index, expect {expected}")]
    IncorrectIndex {
        /// Family label.
        family: &'static str,
        /// The only index that would have been accepted.
        expected: u64,
    },

    /// Counter is at `u64::MAX`; the pair can take no further index.
    #[error("{family}:index exhausted")]
    IndexExhausted {
        /// Family label.
        family: &'static str,
    },

    /// Destination rollback index went backwards.
    #[error("incorrect dstRollback index, expect {expected}")]
    IncorrectDstRollbackIndex {
        /// Smallest acceptable index.
        expected: u64,
    },

    /// Relay mode: target chaincode not approved.
    #[error("dest address is not in local white list")]
    NotInLocalWhitelist,

    /// Direct mode: peer service not registered.
    #[error("remote service is not registered")]
    RemoteServiceNotRegistered,

    /// Direct mode: caller is on the service's ban list.
    #[error("remote service is not allowed to call dest address")]
    CallerBanned,

    /// Batch target has no ordered flag.
    #[error("cannot get service ordered")]
    ServiceOrderUnknown,

    /// Batch target requires ordered delivery.
    #[error("dst service is not ordered")]
    ServiceOrdered,

    /// `audit` on a chaincode that never registered.
    #[error("Proposal not found")]
    ProposalNotFound,

    /// Vote status other than 0 or 1.
    #[error("vote proposal: vote status should be 0 or 1")]
    InvalidVoteStatus,

    /// Second vote from the same admin.
    #[error("vote proposal: current user has voted the proposal")]
    AlreadyVoted,

    /// Vote on a proposal that was already decided.
    #[error("vote proposal: the proposal does not exist")]
    ProposalClosed,

    /// Receipt for an index that was never emitted.
    #[error("out message {pair}/{index} not found")]
    OutMessageNotFound {
        /// Service pair key.
        pair: String,
        /// Sequence index.
        index: u64,
    },

    /// No receipt recorded at (pair, index).
    #[error("in message {pair}/{index} not found")]
    InMessageNotFound {
        /// Service pair key.
        pair: String,
        /// Sequence index.
        index: u64,
    },

    /// Receipt type outside 1..=4 in direct mode.
    #[error("IBTP type is not correct in direct mode")]
    InvalidDirectType,

    /// Nested call to the transaction tracker failed.
    #[error("invoke transaction chaincode: {status} - {message}")]
    Tracker {
        /// Response status.
        status: i32,
        /// Response message.
        message: String,
    },

    /// Malformed identifier or wire value.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Ledger state access failed.
    #[error("{0}")]
    Ledger(#[from] LedgerError),
}
