//! # Value Objects
//!
//! Operating mode, counter families addressed by index updates, vote
//! statuses and the state keys the broker persists.

use crate::domain::errors::BrokerError;
use ir_01_ledger_store::CounterFamily;

/// Relay hub domain ID written by `Init`.
pub const DEFAULT_BXH_ID: &str = "1356";

/// Appchain ID written by `Init`.
pub const DEFAULT_APPCHAIN_ID: &str = "appchain1";

/// Validator threshold written by `Init`; any non-zero value is relay mode.
pub const DEFAULT_VAL_THRESHOLD: u64 = 1;

/// Admin threshold written by `Init` and restored by `initialize`.
pub const DEFAULT_ADMIN_THRESHOLD: u64 = 1;

/// Argument appended to a forward call.
pub const FORWARD_FLAG: &str = "false";

/// Argument appended to a rollback call on the destination.
pub const ROLLBACK_FLAG: &str = "true";

/// State keys. Counter and message rows live under the ledger store's own
/// prefixes; these are the single-value entries.
pub mod keys {
    /// Relay hub domain ID.
    pub const BXH_ID: &str = "bxh-id";
    /// Application chain ID.
    pub const APPCHAIN_ID: &str = "appchain-id";
    /// Validator threshold; zero selects direct mode.
    pub const VAL_THRESHOLD: &str = "val-threshold";
    /// Approvals needed to whitelist a chaincode.
    pub const ADMIN_THRESHOLD: &str = "admin-threshold";
    /// MSP id to 1.
    pub const ADMIN_LIST: &str = "admin-list";
    /// `channel&name` to approved flag.
    pub const LOCAL_WHITELIST: &str = "local-whitelist";
    /// `channel&name` to pending proposal.
    pub const LOCAL_SERVICE_PROPOSAL: &str = "local-service-proposal";
    /// Approved chaincodes in approval order.
    pub const LOCAL_SERVICE_LIST: &str = "local-service-list";
    /// `channel&name` to ordered flag.
    pub const SERVICE_ORDERED_LIST: &str = "service-ordered-list";
    /// Relay-hub validator addresses.
    pub const VALIDATOR_LIST: &str = "validator-list";
}

/// How inbound calls are authorized and acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The relay hub and its validators arbitrate.
    Relay,
    /// Peer-to-peer; the transaction tracker runs the saga.
    Direct,
}

impl Mode {
    /// Mode selected by a validator threshold.
    pub fn from_threshold(threshold: u64) -> Self {
        if threshold == 0 {
            Mode::Direct
        } else {
            Mode::Relay
        }
    }

    /// Whether the tracker is involved.
    pub fn is_direct(&self) -> bool {
        matches!(self, Mode::Direct)
    }
}

/// Counter family selected by `invokeIndexUpdate`'s request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFamily {
    /// Forward requests received (0).
    Inner,
    /// Receipts received for our own requests (1).
    Callback,
    /// Rollbacks applied on the destination side (2).
    DstRollback,
}

impl IndexFamily {
    /// Wire code.
    pub fn code(&self) -> u64 {
        match self {
            IndexFamily::Inner => 0,
            IndexFamily::Callback => 1,
            IndexFamily::DstRollback => 2,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u64) -> Result<Self, BrokerError> {
        match code {
            0 => Ok(IndexFamily::Inner),
            1 => Ok(IndexFamily::Callback),
            2 => Ok(IndexFamily::DstRollback),
            other => Err(BrokerError::InvalidArguments(format!(
                "unknown index update type {}",
                other
            ))),
        }
    }

    /// Ledger counter backing this family.
    pub fn counter(&self) -> CounterFamily {
        match self {
            IndexFamily::Inner => CounterFamily::Inner,
            IndexFamily::Callback => CounterFamily::Callback,
            IndexFamily::DstRollback => CounterFamily::DstRollback,
        }
    }

    /// Prefix of ordering errors.
    pub fn label(&self) -> &'static str {
        match self {
            IndexFamily::Inner => "inner meta",
            IndexFamily::Callback => "callback",
            IndexFamily::DstRollback => "dstRollback",
        }
    }
}

/// An admin's vote on a registration proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteStatus {
    /// 0
    Reject,
    /// 1
    Approve,
}

impl VoteStatus {
    /// Parse the vote code; only 0 and 1 are votes.
    pub fn from_code(code: u64) -> Result<Self, BrokerError> {
        match code {
            0 => Ok(VoteStatus::Reject),
            1 => Ok(VoteStatus::Approve),
            _ => Err(BrokerError::InvalidVoteStatus),
        }
    }
}

/// Where a proposal stands after a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Neither threshold reached.
    Pending,
    /// Chaincode joins the whitelist.
    Approved,
    /// Proposal abandoned.
    Rejected,
}
