//! # In-Process Ledger
//!
//! A single-channel chaincode host. Every proposal runs under one lock, so
//! state-mutating operations are totally ordered the way a consensus-backed
//! ledger orders them.

use super::overlay::TxState;
use super::stub::{ChaincodeRegistry, ChaincodeStub};
use crate::domain::{LedgerError, TransactionRecord, TxContext};
use crate::ports::{BatchOperation, Chaincode, KeyValueStore};
use parking_lot::{Mutex, RwLock};
use shared_types::ChaincodeResponse;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

const TX_RECORD_PREFIX: &[u8] = b"\x00tx\x00";

/// A proposal sent to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    /// MSP ID of the submitter.
    pub creator: String,
    /// Target chaincode name.
    pub chaincode: String,
    /// Function name followed by its arguments.
    pub args: Vec<Vec<u8>>,
}

impl Proposal {
    /// Build a proposal from a function name and byte arguments.
    pub fn new(
        creator: impl Into<String>,
        chaincode: impl Into<String>,
        function: &str,
        args: Vec<Vec<u8>>,
    ) -> Self {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(function.as_bytes().to_vec());
        all.extend(args);
        Self {
            creator: creator.into(),
            chaincode: chaincode.into(),
            args: all,
        }
    }
}

/// Outcome of an executed or queried proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResponse {
    /// Transaction ID; fetch its proof with `query_transaction`.
    pub tx_id: String,
    /// Chaincode response.
    pub response: ChaincodeResponse,
}

/// Chaincode host over a `KeyValueStore`.
pub struct InProcessLedger<S: KeyValueStore> {
    channel_id: String,
    store: Mutex<S>,
    registry: RwLock<ChaincodeRegistry>,
}

impl<S: KeyValueStore> InProcessLedger<S> {
    /// Create a host for one channel.
    pub fn new(channel_id: impl Into<String>, store: S) -> Self {
        Self {
            channel_id: channel_id.into(),
            store: Mutex::new(store),
            registry: RwLock::new(ChaincodeRegistry::new()),
        }
    }

    /// Channel served by this host.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Deploy a chaincode and run its `init` as a committed transaction.
    pub fn deploy(
        &self,
        name: &str,
        chaincode: Arc<dyn Chaincode>,
        creator: &str,
        init_args: Vec<Vec<u8>>,
    ) -> Result<TxResponse, LedgerError> {
        {
            let mut registry = self.registry.write();
            if registry.contains_key(name) {
                return Err(LedgerError::ChaincodeExists(name.to_string()));
            }
            registry.insert(name.to_string(), chaincode);
        }
        info!("[ir-01] Deployed chaincode {} on {}", name, self.channel_id);

        let mut args = vec![b"init".to_vec()];
        args.extend(init_args);
        let proposal = Proposal {
            creator: creator.to_string(),
            chaincode: name.to_string(),
            args,
        };
        let result = self.run(&proposal, true, true);
        if result.is_err() {
            self.registry.write().remove(name);
        }
        result
    }

    /// Simulate, then commit when the response status is below 400.
    pub fn execute(&self, proposal: &Proposal) -> Result<TxResponse, LedgerError> {
        self.run(proposal, true, false)
    }

    /// Simulate without committing.
    pub fn query(&self, proposal: &Proposal) -> Result<TxResponse, LedgerError> {
        self.run(proposal, false, false)
    }

    /// Encoded `TransactionRecord` of a committed transaction.
    pub fn query_transaction(&self, tx_id: &str) -> Result<Vec<u8>, LedgerError> {
        let store = self.store.lock();
        store
            .get(&tx_record_key(tx_id))?
            .ok_or_else(|| LedgerError::TransactionNotFound(tx_id.to_string()))
    }

    fn run(&self, proposal: &Proposal, commit: bool, init: bool) -> Result<TxResponse, LedgerError> {
        let registry = self.registry.read().clone();
        let chaincode = registry
            .get(&proposal.chaincode)
            .cloned()
            .ok_or_else(|| LedgerError::ChaincodeNotFound(proposal.chaincode.clone()))?;

        let ctx = TxContext {
            tx_id: Uuid::new_v4().simple().to_string(),
            channel_id: self.channel_id.clone(),
            creator: proposal.creator.clone(),
            entry_chaincode: proposal.chaincode.clone(),
            timestamp: unix_now(),
        };

        let mut store = self.store.lock();
        let (response, mut batch) = {
            let mut overlay = TxState::new(&*store);
            let response = {
                let mut stub = ChaincodeStub::new(
                    &mut overlay,
                    &registry,
                    &ctx,
                    proposal.chaincode.clone(),
                    proposal.args.clone(),
                );
                if init {
                    chaincode.init(&mut stub)
                } else {
                    chaincode.invoke(&mut stub)
                }
            };
            (response, overlay.into_batch())
        };

        if !response.is_ok() {
            debug!(
                "[ir-01] tx {} on {} rejected: {}",
                ctx.tx_id, proposal.chaincode, response.message
            );
            return Err(LedgerError::ChaincodeStatus {
                status: response.status,
                message: response.message,
            });
        }

        if commit {
            let record = TransactionRecord {
                tx_id: ctx.tx_id.clone(),
                channel_id: ctx.channel_id.clone(),
                chaincode: proposal.chaincode.clone(),
                args: proposal.args.clone(),
                response: response.clone(),
                timestamp: ctx.timestamp,
            };
            let encoded = record.encode().map_err(|e| LedgerError::CorruptedState {
                key: ctx.tx_id.clone(),
                message: e.to_string(),
            })?;
            batch.push(BatchOperation::put(tx_record_key(&ctx.tx_id), encoded));

            let writes = batch.len();
            if let Err(e) = store.atomic_batch_write(batch) {
                warn!("[ir-01] Commit of tx {} failed: {}", ctx.tx_id, e);
                return Err(e.into());
            }
            debug!("[ir-01] Committed tx {} ({} writes)", ctx.tx_id, writes);
        }

        Ok(TxResponse {
            tx_id: ctx.tx_id,
            response,
        })
    }
}

fn tx_record_key(tx_id: &str) -> Vec<u8> {
    let mut key = TX_RECORD_PREFIX.to_vec();
    key.extend_from_slice(tx_id.as_bytes());
    key
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
