//! # Outbound Ports
//!
//! The ledger as the relay client sees it: named broker functions taking
//! byte arguments, plus transaction lookup for proofs.

use crate::domain::ClientError;
use async_trait::async_trait;

/// Response of a ledger call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerResponse {
    /// Transaction ID. Committed only for `execute`.
    pub tx_id: String,
    /// Chaincode status.
    pub status: i32,
    /// Returned bytes.
    pub payload: Vec<u8>,
}

/// Broker chaincode endpoint - outbound port.
///
/// Errors follow the ledger SDK convention: a chaincode error status is
/// returned as `ClientError::ChaincodeStatus`, never as a response.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Simulate a broker function without committing.
    async fn query(&self, function: &str, args: Vec<Vec<u8>>)
        -> Result<LedgerResponse, ClientError>;

    /// Run a broker function and commit it.
    async fn execute(
        &self,
        function: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<LedgerResponse, ClientError>;

    /// Action payload of a committed transaction.
    async fn query_transaction(&self, tx_id: &str) -> Result<Vec<u8>, ClientError>;
}
