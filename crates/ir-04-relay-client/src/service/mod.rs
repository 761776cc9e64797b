//! # Relay Client Service
//!
//! The relay client bound to one broker endpoint.
//!
//! ## Architecture
//!
//! 1. Reads (`RelayQueryApi`) query counters and execute message reads so
//!    their transaction IDs yield proofs
//! 2. Writes (`RelaySubmitApi`) run under `RetryPolicy`; a definitive
//!    chaincode failure comes back as a structured failure, not an error
//! 3. `Poller` walks the outer and inner counters and pushes every new
//!    message onto the delivery channel
//!
//! The client holds no authoritative state. The only cache it keeps is the
//! chain ID pair; an inbound IBTP whose destination disagrees with it
//! triggers a fresh read, so a broker re-initialized under new IDs is
//! picked up without a restart.

mod poller;
mod proof;
mod queries;
mod retry;
mod submit;

pub use poller::Poller;
pub use proof::ProofFetcher;
pub use retry::{wait_for_shutdown, RetryPolicy};

use crate::domain::{ChainIds, ClientConfig, ClientError};
use crate::ports::{LedgerClient, LedgerResponse};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use shared_types::{BrokerResponse, ChaincodeResponse};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Relay client over a broker endpoint.
pub struct RelayClient {
    ledger: Arc<dyn LedgerClient>,
    config: ClientConfig,
    retry: RetryPolicy,
    proofs: ProofFetcher,
    chain_ids: RwLock<Option<ChainIds>>,
}

impl RelayClient {
    /// Client over `ledger`; `shutdown` cancels in-flight retries.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        config: ClientConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let retry = RetryPolicy::new(config.retry_interval, shutdown);
        let proofs = ProofFetcher::new(Arc::clone(&ledger), retry.clone());
        info!("[ir-04] Relay client {} ready", config.name);
        Self {
            ledger,
            config,
            retry,
            proofs,
            chain_ids: RwLock::new(None),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Retry policy shared by every ledger-mutating call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run a mutating broker function with retry and parse its
    /// `BrokerResponse`.
    ///
    /// A definitive chaincode failure is downgraded to an error-status
    /// response carrying the failure from the message.
    async fn invoke_structured(
        &self,
        function: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError> {
        let ledger = &self.ledger;
        let outcome = self
            .retry
            .run(function, || ledger.execute(function, args.clone()))
            .await;

        match outcome {
            Ok(response) => {
                info!(
                    "[ir-04] {} cc status {}, payload {}",
                    function,
                    response.status,
                    String::from_utf8_lossy(&response.payload)
                );
                let parsed = BrokerResponse::from_json(&response.payload)
                    .map_err(|e| ClientError::decode("broker response", e))?;
                Ok((response, parsed))
            }
            Err(ClientError::ChaincodeStatus { status, message })
                if status == ChaincodeResponse::ERROR =>
            {
                error!("[ir-04] {} failed: {}", function, message);
                let parsed = BrokerResponse::from_json(message.as_bytes())
                    .unwrap_or_else(|_| BrokerResponse::failure(message.clone()));
                let response = LedgerResponse {
                    tx_id: String::new(),
                    status,
                    payload: message.into_bytes(),
                };
                Ok((response, parsed))
            }
            Err(e) => Err(e),
        }
    }
}

fn decode_json<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::decode(what, e))
}
