//! # Broker Service - Receipts
//!
//! Closing the loop on our own events: the receipt picks the callback or
//! the rollback registered at emission time and runs it on the emitter.

use super::*;
use crate::domain::{IndexFamily, ReceiptRequest};
use ir_01_ledger_store::MessageStore;
use shared_types::{ChaincodeKey, FullServiceId, IbtpType, ServicePair};
use tracing::{info, warn};

impl BrokerService<'_, '_> {
    /// Drive the direct-mode saga for a receipt. Returns whether the event
    /// should be rolled back, or `None` when nothing else is to be done.
    fn settle_direct(
        &mut self,
        request: &ReceiptRequest,
        src_full_id: &str,
    ) -> Result<Option<bool>, BrokerError> {
        let index = request.index.to_string();
        let args = [src_full_id, request.dst_full_id.as_str(), index.as_str()];
        match request.typ {
            IbtpType::Interchain => Err(BrokerError::InvalidDirectType),
            IbtpType::ReceiptSuccess => {
                self.call_tracker("endTransactionSuccess", &args)?;
                Ok(Some(false))
            }
            IbtpType::ReceiptFailure => {
                self.call_tracker("endTransactionFail", &args)?;
                Ok(Some(true))
            }
            IbtpType::ReceiptRollback => {
                self.call_tracker("rollbackTransaction", &args)?;
                Ok(Some(true))
            }
            IbtpType::ReceiptRollbackEnd => {
                self.call_tracker("endTransactionRollback", &args)?;
                Ok(None)
            }
        }
    }

    pub(crate) fn apply_receipt(&mut self, request: ReceiptRequest) -> Result<Vec<u8>, BrokerError> {
        let src_full_id = self.full_service_id(&request.src_addr.to_string())?;
        let rollback = match self.mode()? {
            Mode::Relay => request.tx_status.requires_rollback(),
            Mode::Direct => match self.settle_direct(&request, &src_full_id)? {
                Some(rollback) => rollback,
                None => {
                    info!(
                        "[ir-03] Rollback of {}-{} #{} confirmed",
                        src_full_id, request.dst_full_id, request.index
                    );
                    return Ok(Vec::new());
                }
            },
        };

        let pair = ServicePair::new(src_full_id, request.dst_full_id.clone());
        self.update_index(&pair, request.index, IndexFamily::Callback)?;

        let event = self
            .stub
            .event(&pair.key(), request.index)?
            .ok_or_else(|| BrokerError::OutMessageNotFound {
                pair: pair.key(),
                index: request.index,
            })?;

        let call = if rollback {
            event.rollback.clone()
        } else {
            let mut callback = event.callback.clone();
            callback.args.extend(request.result.iter().cloned());
            callback
        };
        if call.is_empty() {
            debug!("[ir-03] {} #{} has nothing to call back", pair, request.index);
            return Ok(Vec::new());
        }

        let emitter = FullServiceId::parse(&event.src_full_id)?;
        let target = ChaincodeKey::parse(&emitter.service_id)?;
        let mut args = Vec::with_capacity(call.args.len() + 1);
        args.push(call.func.as_bytes().to_vec());
        args.extend(call.args);
        let response = self.stub.invoke_chaincode(&target.name, args, &target.channel);
        if !response.is_ok() {
            warn!(
                "[ir-03] {} of {} #{} failed on {}: {}",
                call.func, pair, request.index, target, response.message
            );
        }
        info!(
            "[ir-03] Receipt {} #{} applied ({})",
            pair,
            request.index,
            if rollback { "rollback" } else { "callback" }
        );
        Ok(response.payload)
    }
}
