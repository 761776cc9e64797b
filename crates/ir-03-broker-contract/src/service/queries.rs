//! # Broker Service - Queries and Direct-Mode Registry
//!
//! Read views over broker state, and the registry calls forwarded to the
//! transaction tracker.

use super::*;
use crate::ports::{BrokerQueryApi, DirectModeApi};
use ir_01_ledger_store::{CounterFamily, MessageStore, SequenceStore};
use shared_types::{Appchain, DirectTransactionMeta, Event, Receipt};
use std::collections::BTreeMap;

fn decode_be_u64(function: &str, bytes: &[u8]) -> Result<u64, BrokerError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| BrokerError::Tracker {
        status: 200,
        message: format!("{} returned {} bytes, expected 8", function, bytes.len()),
    })?;
    Ok(u64::from_be_bytes(raw))
}

fn decode_json<T: serde::de::DeserializeOwned>(function: &str, bytes: &[u8]) -> Result<T, BrokerError> {
    serde_json::from_slice(bytes).map_err(|e| BrokerError::Tracker {
        status: 200,
        message: format!("{} returned malformed JSON: {}", function, e),
    })
}

impl BrokerQueryApi for BrokerService<'_, '_> {
    fn meta(&self, family: CounterFamily) -> Result<BTreeMap<String, u64>, BrokerError> {
        Ok(self.stub.counters(family)?)
    }

    fn out_message(&self, pair: &str, index: u64) -> Result<Event, BrokerError> {
        self.stub
            .event(pair, index)?
            .ok_or_else(|| BrokerError::OutMessageNotFound {
                pair: pair.to_string(),
                index,
            })
    }

    fn in_message(&self, pair: &str, index: u64) -> Result<Receipt, BrokerError> {
        self.stub
            .receipt(pair, index)?
            .ok_or_else(|| BrokerError::InMessageNotFound {
                pair: pair.to_string(),
                index,
            })
    }

    fn chain_id(&self) -> Result<String, BrokerError> {
        let bxh_id = self.get_string(keys::BXH_ID)?.unwrap_or_default();
        let appchain_id = self.get_string(keys::APPCHAIN_ID)?.unwrap_or_default();
        Ok(format!("{}-{}", bxh_id, appchain_id))
    }

    fn local_services(&self) -> Result<Vec<String>, BrokerError> {
        let services: Vec<String> = self.get_json(keys::LOCAL_SERVICE_LIST)?;
        services
            .iter()
            .map(|service| self.full_service_id(service))
            .collect()
    }
}

impl DirectModeApi for BrokerService<'_, '_> {
    fn register_appchain(
        &mut self,
        chain_id: &str,
        broker: &str,
        trust_root: &str,
        rule_addr: &str,
    ) -> Result<Vec<u8>, BrokerError> {
        self.call_tracker("registerAppchain", &[chain_id, broker, trust_root, rule_addr])
    }

    fn register_remote_service(
        &mut self,
        chain_id: &str,
        service_id: &str,
        ban_list: &str,
    ) -> Result<(), BrokerError> {
        self.call_tracker("registerRemoteService", &[chain_id, service_id, ban_list])?;
        Ok(())
    }

    fn appchain_info(&mut self, chain_id: &str) -> Result<Appchain, BrokerError> {
        let bytes = self.call_tracker("getAppchainInfo", &[chain_id])?;
        decode_json("getAppchainInfo", &bytes)
    }

    fn remote_services(&mut self) -> Result<Vec<String>, BrokerError> {
        let bytes = self.call_tracker("getRemoteServiceList", &[])?;
        decode_json("getRemoteServiceList", &bytes)
    }

    fn remote_ban_list(&mut self, full_service_id: &str) -> Result<Vec<String>, BrokerError> {
        let bytes = self.call_tracker("getRSWhiteList", &[full_service_id])?;
        decode_json("getRSWhiteList", &bytes)
    }

    fn direct_transaction_meta(
        &mut self,
        ibtp_id: &str,
    ) -> Result<DirectTransactionMeta, BrokerError> {
        let start = self.call_tracker("getStartTimestamp", &[ibtp_id])?;
        let status = self.call_tracker("getTransactionStatus", &[ibtp_id])?;
        Ok(DirectTransactionMeta {
            start_timestamp: decode_be_u64("getStartTimestamp", &start)?,
            transaction_status: decode_be_u64("getTransactionStatus", &status)?,
        })
    }
}
