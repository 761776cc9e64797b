//! # Proof Fetcher
//!
//! Reads the action payload of an executed transaction for use as the
//! IBTP proof.

use super::retry::RetryPolicy;
use crate::ports::LedgerClient;
use std::sync::Arc;
use tracing::error;

/// Proof lookup with retry.
#[derive(Clone)]
pub struct ProofFetcher {
    ledger: Arc<dyn LedgerClient>,
    retry: RetryPolicy,
}

impl ProofFetcher {
    /// Fetch proofs from `ledger` under `retry`.
    pub fn new(ledger: Arc<dyn LedgerClient>, retry: RetryPolicy) -> Self {
        Self { ledger, retry }
    }

    /// Proof of `tx_id`, or empty bytes if the lookup was abandoned.
    pub async fn fetch(&self, tx_id: &str) -> Vec<u8> {
        let ledger = &self.ledger;
        match self
            .retry
            .run("query transaction", || ledger.query_transaction(tx_id))
            .await
        {
            Ok(proof) => proof,
            Err(e) => {
                error!("[ir-04] Can't get proof for tx {}: {}", tx_id, e);
                Vec::new()
            }
        }
    }
}
