//! # Domain Entities
//!
//! Records the host keeps about committed transactions.

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use shared_types::ChaincodeResponse;

/// Action payload of a committed transaction.
///
/// Serialized bytes of this record are what the proof fetcher returns.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub tx_id: String,
    /// Channel.
    pub channel_id: String,
    /// Invoked chaincode.
    pub chaincode: String,
    /// Proposal arguments, function name first.
    #[serde_as(as = "Vec<Base64>")]
    pub args: Vec<Vec<u8>>,
    /// Endorsed response.
    pub response: ChaincodeResponse,
    /// Unix seconds.
    pub timestamp: u64,
}

impl TransactionRecord {
    /// Encode for storage.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode from storage.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
