//! # Broker Service - Interchain Delivery
//!
//! Outbound emission, inbound calls and the shared ordering check.

use super::*;
use crate::domain::{
    invariant_next_index, invariant_rollback_forward, EmitRequest, IndexFamily,
    IndexUpdateRequest, InterchainRequest, ReceiptRequest, FORWARD_FLAG, ROLLBACK_FLAG,
};
use crate::ports::{DirectModeApi, InterchainApi};
use ir_01_ledger_store::{CounterFamily, MessageStore, SequenceStore};
use shared_types::{
    ChaincodeResponse, Event, FullServiceId, IbtpType, Receipt, ServicePair, TransactionStatus,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

impl BrokerService<'_, '_> {
    /// Ordering check and counter advance for one family of a pair.
    pub(crate) fn update_index(
        &mut self,
        pair: &ServicePair,
        index: u64,
        family: IndexFamily,
    ) -> Result<(), BrokerError> {
        let key = pair.key();
        match family {
            IndexFamily::Inner | IndexFamily::Callback => {
                let counter = self.stub.counter(family.counter(), &key)?;
                invariant_next_index(family.label(), counter, index)?;
                self.stub.set_counter(family.counter(), &key, index)?;
            }
            IndexFamily::DstRollback => {
                let counter = self.stub.counter(CounterFamily::DstRollback, &key)?;
                invariant_rollback_forward(counter, index)?;
                self.stub.set_counter(CounterFamily::DstRollback, &key, index)?;
                // A rollback for the next pending request also consumes it.
                let inner = self.stub.counter(CounterFamily::Inner, &key)?;
                if inner.checked_add(1) == Some(index) {
                    self.stub.set_counter(CounterFamily::Inner, &key, index)?;
                }
            }
        }
        debug!("[ir-03] {} {} -> {}", family.label(), key, index);
        Ok(())
    }

    /// Direct mode: `service` must be registered and the creator must not
    /// be on its ban list.
    fn check_remote_service(&mut self, service: &str) -> Result<(), BrokerError> {
        if !self.remote_services()?.iter().any(|s| s == service) {
            return Err(BrokerError::RemoteServiceNotRegistered);
        }
        let creator = self.stub.creator().to_string();
        if self.remote_ban_list(service)?.contains(&creator) {
            return Err(BrokerError::CallerBanned);
        }
        Ok(())
    }

    /// Who may deliver into `target`.
    fn check_inbound(&mut self, src_full_id: &str, target: &str) -> Result<(), BrokerError> {
        match self.mode()? {
            Mode::Relay => {
                let whitelist: BTreeMap<String, bool> = self.get_json(keys::LOCAL_WHITELIST)?;
                if !whitelist.get(target).copied().unwrap_or(false) {
                    return Err(BrokerError::NotInLocalWhitelist);
                }
                Ok(())
            }
            Mode::Direct => self.check_remote_service(src_full_id),
        }
    }

    fn invoke_local(
        &mut self,
        target: &shared_types::ChaincodeKey,
        func: &str,
        args: &[Vec<u8>],
        trailing: Option<&str>,
    ) -> ChaincodeResponse {
        let mut call = Vec::with_capacity(args.len() + 2);
        call.push(func.as_bytes().to_vec());
        call.extend(args.iter().cloned());
        if let Some(flag) = trailing {
            call.push(flag.as_bytes().to_vec());
        }
        self.stub.invoke_chaincode(&target.name, call, &target.channel)
    }
}

impl InterchainApi for BrokerService<'_, '_> {
    fn emit_interchain_event(&mut self, request: EmitRequest) -> Result<Event, BrokerError> {
        FullServiceId::parse(&request.dst_full_id)?;
        let mode = self.mode()?;
        if mode.is_direct() {
            self.check_remote_service(&request.dst_full_id)?;
        }

        let src_full_id = self.full_service_id(&self.caller_key())?;
        let pair = ServicePair::new(src_full_id.clone(), request.dst_full_id.clone());
        let index = self.stub.bump_counter(CounterFamily::Outer, &pair.key())?;

        let event = Event {
            index,
            dst_full_id: request.dst_full_id,
            src_full_id,
            encrypt: request.encrypt,
            call_func: request.call_func,
            callback: request.callback,
            rollback: request.rollback,
        };
        self.stub.put_event(&event)?;

        if mode.is_direct() {
            let index = index.to_string();
            self.call_tracker(
                "startTransaction",
                &[event.src_full_id.as_str(), event.dst_full_id.as_str(), index.as_str()],
            )?;
        }
        info!(
            "[ir-03] Emitted {} #{} ({})",
            pair, event.index, event.call_func.func
        );
        Ok(event)
    }

    fn invoke_interchain(&mut self, request: InterchainRequest) -> Result<Vec<u8>, BrokerError> {
        let target_key = request.target.to_string();
        let dst_full_id = self.full_service_id(&target_key)?;
        let pair = ServicePair::new(request.src_full_id.clone(), dst_full_id);
        self.check_inbound(&request.src_full_id, &target_key)?;
        let mode = self.mode()?;

        let (typ, response) = if request.is_request() {
            self.update_index(&pair, request.index, IndexFamily::Inner)?;
            let response =
                self.invoke_local(&request.target, &request.func, &request.args, Some(FORWARD_FLAG));
            let typ = if response.is_ok() {
                IbtpType::ReceiptSuccess
            } else {
                IbtpType::ReceiptFailure
            };
            (typ, response)
        } else {
            // Only undo a call that was actually applied here.
            let applied = self.stub.counter(CounterFamily::Inner, &pair.key())? >= request.index;
            self.update_index(&pair, request.index, IndexFamily::DstRollback)?;
            let response = if applied {
                self.invoke_local(&request.target, &request.func, &request.args, Some(ROLLBACK_FLAG))
            } else {
                ChaincodeResponse::default()
            };
            let typ = match (mode, request.tx_status) {
                (Mode::Direct, _) => IbtpType::ReceiptRollbackEnd,
                (Mode::Relay, TransactionStatus::BeginFailure) => IbtpType::ReceiptFailure,
                (Mode::Relay, _) => IbtpType::ReceiptRollback,
            };
            (typ, response)
        };

        if !response.is_ok() {
            warn!(
                "[ir-03] {}.{} failed for {} #{}: {}",
                request.target, request.func, pair, request.index, response.message
            );
        }
        let payload = response.payload.clone();
        let receipt = Receipt {
            encrypt: request.encrypt,
            typ,
            result: response,
        };
        self.stub.put_receipt(&pair.key(), request.index, &receipt)?;
        info!("[ir-03] Delivered {} #{} as {:?}", pair, request.index, typ);
        Ok(payload)
    }

    fn invoke_interchains(&mut self, requests: Vec<InterchainRequest>) -> Result<(), BrokerError> {
        let ordered: BTreeMap<String, bool> = self.get_json(keys::SERVICE_ORDERED_LIST)?;
        for request in &requests {
            match ordered.get(&request.target.to_string()) {
                None => return Err(BrokerError::ServiceOrderUnknown),
                Some(true) => return Err(BrokerError::ServiceOrdered),
                Some(false) => {}
            }
        }
        let count = requests.len();
        for request in requests {
            self.invoke_interchain(request)?;
        }
        info!("[ir-03] Delivered batch of {}", count);
        Ok(())
    }

    fn invoke_receipt(&mut self, request: ReceiptRequest) -> Result<Vec<u8>, BrokerError> {
        self.apply_receipt(request)
    }

    fn invoke_index_update(&mut self, request: IndexUpdateRequest) -> Result<(), BrokerError> {
        let pair = ServicePair::new(request.src_full_id, request.dst_full_id);
        self.update_index(&pair, request.index, request.family)
    }
}
