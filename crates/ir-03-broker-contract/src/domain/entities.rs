//! # Domain Entities
//!
//! The registration proposal and the typed requests the broker's
//! entrypoints decode their string arguments into.

use crate::domain::errors::BrokerError;
use crate::domain::value_objects::{IndexFamily, VoteOutcome, VoteStatus};
use serde::{Deserialize, Serialize};
use shared_types::{CallFunc, ChaincodeKey, IbtpType, TransactionStatus};

/// Pending registration of a local chaincode.
///
/// `exist` is cleared once a threshold is reached, which closes the
/// proposal to further votes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProposal {
    /// Approve votes cast.
    pub approve: u64,
    /// Reject votes cast.
    pub reject: u64,
    /// MSP ids that have voted.
    #[serde(default)]
    pub voted_admins: Vec<String>,
    /// Whether the chaincode requires ordered delivery.
    pub ordered: bool,
    /// Open for voting.
    pub exist: bool,
}

impl RegistrationProposal {
    /// Fresh proposal with no votes.
    pub fn open(ordered: bool) -> Self {
        Self {
            ordered,
            exist: true,
            ..Default::default()
        }
    }

    /// Record `admin`'s vote and report whether a threshold was reached.
    ///
    /// Approval needs `threshold` approvals; rejection needs
    /// `admin_count - threshold + 1` rejections, the point at which approval
    /// can no longer be reached.
    pub fn vote(
        &mut self,
        admin: &str,
        status: VoteStatus,
        threshold: u64,
        admin_count: u64,
    ) -> Result<VoteOutcome, BrokerError> {
        if !self.exist {
            return Err(BrokerError::ProposalClosed);
        }
        if self.voted_admins.iter().any(|voted| voted == admin) {
            return Err(BrokerError::AlreadyVoted);
        }
        self.voted_admins.push(admin.to_string());

        let outcome = match status {
            VoteStatus::Approve => {
                self.approve += 1;
                if self.approve >= threshold {
                    VoteOutcome::Approved
                } else {
                    VoteOutcome::Pending
                }
            }
            VoteStatus::Reject => {
                self.reject += 1;
                if self.reject >= (admin_count + 1).saturating_sub(threshold) {
                    VoteOutcome::Rejected
                } else {
                    VoteOutcome::Pending
                }
            }
        };
        if outcome != VoteOutcome::Pending {
            self.exist = false;
        }
        Ok(outcome)
    }
}

/// Arguments of `EmitInterchainEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRequest {
    /// Destination full service ID.
    pub dst_full_id: String,
    /// Call executed on the destination.
    pub call_func: CallFunc,
    /// Callback on success.
    pub callback: CallFunc,
    /// Rollback on failure.
    pub rollback: CallFunc,
    /// Payload encryption flag.
    pub encrypt: bool,
}

/// Arguments of `invokeInterchain`, one element of `invokeInterchains`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchainRequest {
    /// Source full service ID.
    pub src_full_id: String,
    /// Local target chaincode.
    pub target: ChaincodeKey,
    /// Sequence index under the pair.
    pub index: u64,
    /// IBTP type as delivered; the stored receipt type is recomputed.
    pub typ: IbtpType,
    /// Function to invoke on the target.
    pub func: String,
    /// Arguments of the call.
    pub args: Vec<Vec<u8>>,
    /// `Begin` for a forward request, anything else acknowledges.
    pub tx_status: TransactionStatus,
    /// Relay-hub signatures; carried but not checked on the ledger.
    pub multi_sign: Vec<Vec<u8>>,
    /// Payload encryption flag.
    pub encrypt: bool,
}

impl InterchainRequest {
    /// Whether this delivers a forward call rather than an acknowledgement.
    pub fn is_request(&self) -> bool {
        self.tx_status == TransactionStatus::Begin
    }
}

/// Arguments of `invokeReceipt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRequest {
    /// Local chaincode that emitted the original event.
    pub src_addr: ChaincodeKey,
    /// Destination full service ID of the original event.
    pub dst_full_id: String,
    /// Index of the original event.
    pub index: u64,
    /// Receipt type.
    pub typ: IbtpType,
    /// Results returned by the destination.
    pub result: Vec<Vec<u8>>,
    /// Status reported by the relay hub.
    pub tx_status: TransactionStatus,
    /// Relay-hub signatures; carried but not checked on the ledger.
    pub multi_sign: Vec<Vec<u8>>,
}

/// Arguments of `invokeIndexUpdate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexUpdateRequest {
    /// Source full service ID.
    pub src_full_id: String,
    /// Destination full service ID.
    pub dst_full_id: String,
    /// Index to record.
    pub index: u64,
    /// Counter family to advance.
    pub family: IndexFamily,
}
