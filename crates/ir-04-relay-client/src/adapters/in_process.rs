//! # In-Process Ledger Client
//!
//! Implements `LedgerClient` over an `InProcessLedger` in the same
//! process, calling the broker under a fixed creator identity.

use crate::domain::ClientError;
use crate::ports::{LedgerClient, LedgerResponse};
use async_trait::async_trait;
use ir_01_ledger_store::{InProcessLedger, KeyValueStore, LedgerError, Proposal, TxResponse};
use std::sync::Arc;
use tracing::trace;

/// Broker endpoint on an in-process ledger.
pub struct InProcessLedgerClient<S: KeyValueStore> {
    ledger: Arc<InProcessLedger<S>>,
    chaincode: String,
    creator: String,
}

impl<S: KeyValueStore> InProcessLedgerClient<S> {
    /// Client calling `chaincode` as `creator`.
    pub fn new(
        ledger: Arc<InProcessLedger<S>>,
        chaincode: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            chaincode: chaincode.into(),
            creator: creator.into(),
        }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &Arc<InProcessLedger<S>> {
        &self.ledger
    }

    fn proposal(&self, function: &str, args: Vec<Vec<u8>>) -> Proposal {
        Proposal::new(self.creator.as_str(), self.chaincode.as_str(), function, args)
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> LedgerClient for InProcessLedgerClient<S> {
    async fn query(
        &self,
        function: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<LedgerResponse, ClientError> {
        trace!("[ir-04] query {}", function);
        let response = self.ledger.query(&self.proposal(function, args))?;
        Ok(response.into())
    }

    async fn execute(
        &self,
        function: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<LedgerResponse, ClientError> {
        trace!("[ir-04] execute {}", function);
        let response = self.ledger.execute(&self.proposal(function, args))?;
        Ok(response.into())
    }

    async fn query_transaction(&self, tx_id: &str) -> Result<Vec<u8>, ClientError> {
        Ok(self.ledger.query_transaction(tx_id)?)
    }
}

impl From<TxResponse> for LedgerResponse {
    fn from(tx: TxResponse) -> Self {
        Self {
            tx_id: tx.tx_id,
            status: tx.response.status,
            payload: tx.response.payload,
        }
    }
}

impl From<LedgerError> for ClientError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ChaincodeStatus { status, message } => {
                ClientError::ChaincodeStatus { status, message }
            }
            LedgerError::TransactionNotFound(tx_id) => ClientError::TransactionNotFound(tx_id),
            other => ClientError::Unavailable(other.to_string()),
        }
    }
}
