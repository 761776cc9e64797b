//! # Broker Service
//!
//! Broker logic bound to one running transaction.
//!
//! ## Architecture
//!
//! The service wraps the chaincode stub of the current proposal:
//! 1. Counters and message bodies go through `SequenceStore` and
//!    `MessageStore`, one row per entry
//! 2. Governance state is kept as JSON values under fixed keys
//! 3. Direct-mode calls reach the `transaction` chaincode through nested
//!    invocation, so the saga shares this transaction's write set
//!
//! Every entrypoint validates before it writes; a failed entrypoint makes
//! the ledger discard all writes of the transaction.

mod governance;
mod interchain;
mod queries;
mod receipt;
#[cfg(test)]
mod tests;

use crate::domain::keys;
use crate::domain::{BrokerError, Mode, DEFAULT_VAL_THRESHOLD};
use ir_01_ledger_store::{ChaincodeStub, LedgerError, StateAccess};
use ir_02_transaction_tracker::TRANSACTION_CONTRACT_NAME;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// The broker, operating on one transaction's stub.
pub struct BrokerService<'a, 'b> {
    pub(crate) stub: &'a mut ChaincodeStub<'b>,
}

impl<'a, 'b> BrokerService<'a, 'b> {
    /// Bind to the current transaction.
    pub fn new(stub: &'a mut ChaincodeStub<'b>) -> Self {
        Self { stub }
    }

    /// Operating mode from the stored validator threshold.
    pub fn mode(&self) -> Result<Mode, BrokerError> {
        Ok(Mode::from_threshold(self.val_threshold()?))
    }

    /// Stored validator threshold; unset reads as the `Init` default.
    pub fn val_threshold(&self) -> Result<u64, BrokerError> {
        match self.get_string(keys::VAL_THRESHOLD)? {
            None => Ok(DEFAULT_VAL_THRESHOLD),
            Some(raw) => raw.parse().map_err(|_| {
                BrokerError::Ledger(LedgerError::CorruptedState {
                    key: keys::VAL_THRESHOLD.to_string(),
                    message: format!("not an integer: {}", raw),
                })
            }),
        }
    }

    /// `{bxhID}:{appchainID}:{service}`.
    pub fn full_service_id(&self, service: &str) -> Result<String, BrokerError> {
        let bxh_id = self.get_string(keys::BXH_ID)?.unwrap_or_default();
        let appchain_id = self.get_string(keys::APPCHAIN_ID)?.unwrap_or_default();
        Ok(format!("{}:{}:{}", bxh_id, appchain_id, service))
    }

    pub(crate) fn get_string(&self, key: &str) -> Result<Option<String>, BrokerError> {
        Ok(self
            .stub
            .get_state(key)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub(crate) fn put_string(&mut self, key: &str, value: &str) -> Result<(), BrokerError> {
        self.stub.put_state(key, value.as_bytes().to_vec())?;
        Ok(())
    }

    /// JSON value under `key`; absent reads as `T::default()`.
    pub(crate) fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, BrokerError> {
        match self.stub.get_state(key)? {
            None => Ok(T::default()),
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                BrokerError::Ledger(LedgerError::CorruptedState {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }),
        }
    }

    pub(crate) fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), BrokerError> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            BrokerError::Ledger(LedgerError::CorruptedState {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        self.stub.put_state(key, bytes)?;
        Ok(())
    }

    /// Nested call into the transaction tracker on this channel.
    pub(crate) fn call_tracker(&mut self, function: &str, args: &[&str]) -> Result<Vec<u8>, BrokerError> {
        let mut call = Vec::with_capacity(args.len() + 1);
        call.push(function.as_bytes().to_vec());
        call.extend(args.iter().map(|arg| arg.as_bytes().to_vec()));

        let channel = self.stub.channel_id().to_string();
        debug!("[ir-03] tracker {}({})", function, args.join(","));
        let response = self
            .stub
            .invoke_chaincode(TRANSACTION_CONTRACT_NAME, call, &channel);
        if !response.is_ok() {
            return Err(BrokerError::Tracker {
                status: response.status,
                message: response.message,
            });
        }
        Ok(response.payload)
    }
}
