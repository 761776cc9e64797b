//! # Transaction Tracker Service
//!
//! Implements both inbound ports over any `StateAccess`, so the same logic
//! runs inside the tracker chaincode and in unit tests over `MemoryState`.

use crate::domain::{remote_full_service_id, DirectTxStatus, TrackerError};
use crate::ports::{AppchainRegistryApi, TransactionStatusApi};
use ir_01_ledger_store::{LedgerError, StateAccess};
use shared_types::Appchain;
use tracing::debug;

const STATUS_PREFIX: &str = "transaction-status/";
const TIMESTAMP_PREFIX: &str = "start-timestamp/";
const APPCHAIN_PREFIX: &str = "app-chains/";
const REMOTE_SERVICE_PREFIX: &str = "remote-white-list/";

/// Appchain status that allows remote services to be registered.
const APPCHAIN_AVAILABLE: u64 = 1;

/// Tracker bound to one chaincode state.
pub struct TransactionTracker<'s, S: StateAccess + ?Sized> {
    state: &'s mut S,
}

impl<'s, S: StateAccess + ?Sized> TransactionTracker<'s, S> {
    /// Wrap a state handle.
    pub fn new(state: &'s mut S) -> Self {
        Self { state }
    }

    fn read_u64(&self, key: &str) -> Result<u64, TrackerError> {
        match self.state.get_state(key)? {
            None => Ok(0),
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    LedgerError::CorruptedState {
                        key: key.to_string(),
                        message: format!("expected 8 bytes, got {}", bytes.len()),
                    }
                })?;
                Ok(u64::from_be_bytes(raw))
            }
        }
    }

    fn write_u64(&mut self, key: &str, value: u64) -> Result<(), TrackerError> {
        self.state.put_state(key, value.to_be_bytes().to_vec())?;
        Ok(())
    }

    fn transition(&mut self, ibtp_id: &str, next: DirectTxStatus) -> Result<(), TrackerError> {
        let current = self.transaction_status(ibtp_id)?;
        if !current.can_transition_to(next) {
            return Err(DirectTxStatus::rejection(next));
        }
        self.write_u64(&format!("{}{}", STATUS_PREFIX, ibtp_id), next.code())?;
        debug!("[ir-02] {}: {:?} -> {:?}", ibtp_id, current, next);
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, TrackerError> {
        match self.state.get_state(key)? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                LedgerError::CorruptedState {
                    key: key.to_string(),
                    message: e.to_string(),
                }
                .into()
            }),
        }
    }

    fn write_json<T: serde::Serialize>(&mut self, key: &str, value: &T) -> Result<(), TrackerError> {
        let bytes = serde_json::to_vec(value).map_err(|e| LedgerError::CorruptedState {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.state.put_state(key, bytes)?;
        Ok(())
    }
}

impl<S: StateAccess + ?Sized> TransactionStatusApi for TransactionTracker<'_, S> {
    fn start_transaction(&mut self, ibtp_id: &str, now: u64) -> Result<(), TrackerError> {
        self.transition(ibtp_id, DirectTxStatus::Begin)?;
        self.write_u64(&format!("{}{}", TIMESTAMP_PREFIX, ibtp_id), now)
    }

    fn rollback_transaction(&mut self, ibtp_id: &str) -> Result<(), TrackerError> {
        self.transition(ibtp_id, DirectTxStatus::RollbackBegin)
    }

    fn end_transaction_success(&mut self, ibtp_id: &str) -> Result<(), TrackerError> {
        self.transition(ibtp_id, DirectTxStatus::Success)
    }

    fn end_transaction_fail(&mut self, ibtp_id: &str) -> Result<(), TrackerError> {
        self.transition(ibtp_id, DirectTxStatus::Fail)
    }

    fn end_transaction_rollback(&mut self, ibtp_id: &str) -> Result<(), TrackerError> {
        self.transition(ibtp_id, DirectTxStatus::RollbackEnd)
    }

    fn transaction_status(&self, ibtp_id: &str) -> Result<DirectTxStatus, TrackerError> {
        DirectTxStatus::from_code(self.read_u64(&format!("{}{}", STATUS_PREFIX, ibtp_id))?)
    }

    fn start_timestamp(&self, ibtp_id: &str) -> Result<u64, TrackerError> {
        self.read_u64(&format!("{}{}", TIMESTAMP_PREFIX, ibtp_id))
    }
}

impl<S: StateAccess + ?Sized> AppchainRegistryApi for TransactionTracker<'_, S> {
    fn register_appchain(
        &mut self,
        chain_id: &str,
        broker: &str,
        trust_root: &str,
        rule_addr: &str,
    ) -> Result<(), TrackerError> {
        let key = format!("{}{}", APPCHAIN_PREFIX, chain_id);
        if let Some(existing) = self.read_json::<Appchain>(&key)? {
            if existing.exist {
                return Err(TrackerError::AppchainExists);
            }
        }
        let appchain = Appchain {
            id: chain_id.to_string(),
            broker: broker.to_string(),
            trust_root: trust_root.to_string(),
            rule_addr: rule_addr.to_string(),
            status: APPCHAIN_AVAILABLE,
            exist: true,
        };
        self.write_json(&key, &appchain)
    }

    fn appchain(&self, chain_id: &str) -> Result<Appchain, TrackerError> {
        match self.read_json::<Appchain>(&format!("{}{}", APPCHAIN_PREFIX, chain_id))? {
            Some(chain) if chain.exist => Ok(chain),
            _ => Err(TrackerError::AppchainNotRegistered),
        }
    }

    fn register_remote_service(
        &mut self,
        chain_id: &str,
        service_id: &str,
        ban_list: Vec<String>,
    ) -> Result<(), TrackerError> {
        let chain = self.appchain(chain_id)?;
        if chain.status != APPCHAIN_AVAILABLE {
            return Err(TrackerError::AppchainUnavailable);
        }
        let full_id = remote_full_service_id(chain_id, service_id);
        self.write_json(&format!("{}{}", REMOTE_SERVICE_PREFIX, full_id), &ban_list)
    }

    fn remote_services(&self) -> Result<Vec<String>, TrackerError> {
        Ok(self
            .state
            .get_state_by_prefix(REMOTE_SERVICE_PREFIX)?
            .into_iter()
            .map(|(key, _)| key[REMOTE_SERVICE_PREFIX.len()..].to_string())
            .collect())
    }

    fn remote_ban_list(&self, full_service_id: &str) -> Result<Option<Vec<String>>, TrackerError> {
        self.read_json(&format!("{}{}", REMOTE_SERVICE_PREFIX, full_service_id))
    }

    fn reset(&mut self) -> Result<(), TrackerError> {
        for prefix in [STATUS_PREFIX, TIMESTAMP_PREFIX, APPCHAIN_PREFIX, REMOTE_SERVICE_PREFIX] {
            for (key, _) in self.state.get_state_by_prefix(prefix)? {
                self.state.del_state(&key)?;
            }
        }
        Ok(())
    }
}
