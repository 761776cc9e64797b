//! # Simulated Relay Hub
//!
//! Stands in for the relay hub between two relay clients. Request IBTPs
//! are forwarded to the destination chain and receipt IBTPs back to the
//! source. Once a chain accepts an IBTP ID, later copies of it are dropped
//! before they reach the broker.
//!
//! In `HubMode::Direct` the hub is only a pipe between two brokers: proofs
//! carry `Begin`, since no hub consensus ever finalises the transaction.

use ir_04_relay_client::{
    generate_receipt, receipt_result, request_content, ClientError, InboundIbtp, InboundReceipt,
    RelaySubmitApi,
};
use parking_lot::Mutex;
use shared_types::{
    BxhProof, FullServiceId, Ibtp, IbtpType, ProtocolError, SubmitIbtpResponse, TransactionStatus,
};
use std::collections::HashSet;
use tracing::debug;

/// How proofs are stamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HubMode {
    /// Through a relay hub; receipts carry the final status.
    Relay,
    /// Broker to broker.
    Direct,
}

/// In-memory relay hub.
pub struct SimulatedHub {
    mode: HubMode,
    requests: Mutex<HashSet<String>>,
    receipts: Mutex<HashSet<(String, IbtpType)>>,
}

impl SimulatedHub {
    /// Hub for relay-mode chains.
    pub fn relay() -> Self {
        Self::new(HubMode::Relay)
    }

    /// Pipe for direct-mode chains.
    pub fn direct() -> Self {
        Self::new(HubMode::Direct)
    }

    fn new(mode: HubMode) -> Self {
        Self {
            mode,
            requests: Mutex::new(HashSet::new()),
            receipts: Mutex::new(HashSet::new()),
        }
    }

    /// Mode of this hub.
    pub fn mode(&self) -> HubMode {
        self.mode
    }

    /// Inbound view of a request IBTP for its destination chain.
    pub fn inbound_request(&self, ibtp: &Ibtp) -> Result<InboundIbtp, ProtocolError> {
        let to = FullServiceId::parse(&ibtp.to)?;
        let payload = ibtp.decode_payload()?;
        Ok(InboundIbtp {
            from: ibtp.from.clone(),
            index: ibtp.index,
            service_id: to.service_id,
            typ: ibtp.typ,
            content: request_content(ibtp)?,
            proof: BxhProof {
                tx_status: TransactionStatus::Begin,
                multi_sign: Vec::new(),
            },
            encrypted: payload.encrypted,
        })
    }

    /// Inbound view of a receipt IBTP for the chain that sent the request.
    pub fn inbound_receipt(&self, receipt: &Ibtp) -> Result<InboundReceipt, ProtocolError> {
        let from = FullServiceId::parse(&receipt.from)?;
        let tx_status = match (self.mode, receipt.typ) {
            (HubMode::Direct, _) => TransactionStatus::Begin,
            (HubMode::Relay, IbtpType::ReceiptSuccess) => TransactionStatus::Success,
            (HubMode::Relay, _) => TransactionStatus::Failure,
        };
        Ok(InboundReceipt {
            to: receipt.to.clone(),
            index: receipt.index,
            service_id: from.service_id,
            typ: receipt.typ,
            result: receipt_result(receipt)?,
            proof: BxhProof {
                tx_status,
                multi_sign: Vec::new(),
            },
        })
    }

    /// Deliver a request unless the destination already accepted it.
    /// `None` when the ID was a duplicate.
    pub async fn forward_request(
        &self,
        ibtp: &Ibtp,
        dst: &dyn RelaySubmitApi,
    ) -> Result<Option<SubmitIbtpResponse>, ClientError> {
        let id = ibtp.id();
        if self.requests.lock().contains(&id) {
            debug!("[hub] Dropped duplicate request {}", id);
            return Ok(None);
        }
        let response = dst.submit_ibtp(self.inbound_request(ibtp)?).await?;
        if response.status {
            self.requests.lock().insert(id);
        }
        Ok(Some(response))
    }

    /// Deliver requests in one submission, skipping accepted IDs.
    pub async fn forward_batch(
        &self,
        ibtps: &[Ibtp],
        dst: &dyn RelaySubmitApi,
    ) -> Result<SubmitIbtpResponse, ClientError> {
        let pending: Vec<&Ibtp> = {
            let requests = self.requests.lock();
            ibtps.iter().filter(|ibtp| !requests.contains(&ibtp.id())).collect()
        };
        if pending.is_empty() {
            return Ok(SubmitIbtpResponse {
                status: true,
                ..Default::default()
            });
        }
        let batch = pending
            .iter()
            .map(|ibtp| self.inbound_request(ibtp))
            .collect::<Result<Vec<_>, _>>()?;
        let response = dst.submit_ibtp_batch(batch).await?;
        if response.status {
            self.requests.lock().extend(pending.iter().map(|ibtp| ibtp.id()));
        }
        Ok(response)
    }

    /// Deliver a receipt unless its source already accepted one of the
    /// same ID and type. `None` when it was a duplicate.
    pub async fn forward_receipt(
        &self,
        receipt: &Ibtp,
        src: &dyn RelaySubmitApi,
    ) -> Result<Option<SubmitIbtpResponse>, ClientError> {
        let key = (receipt.id(), receipt.typ);
        if self.receipts.lock().contains(&key) {
            debug!("[hub] Dropped duplicate {:?} receipt {}", key.1, key.0);
            return Ok(None);
        }
        let response = src.submit_receipt(self.inbound_receipt(receipt)?).await?;
        if response.status {
            self.receipts.lock().insert(key);
        }
        Ok(Some(response))
    }

    /// Ask the destination to undo a request, as the hub does when the
    /// request times out.
    pub async fn rollback_request(
        &self,
        ibtp: &Ibtp,
        dst: &dyn RelaySubmitApi,
    ) -> Result<SubmitIbtpResponse, ClientError> {
        let mut inbound = self.inbound_request(ibtp)?;
        inbound.proof.tx_status = TransactionStatus::BeginRollback;
        dst.submit_ibtp(inbound).await
    }

    /// Receipt the hub issues itself, for a request that its destination
    /// refused outright or that timed out.
    pub fn receipt(&self, ibtp: &Ibtp, typ: IbtpType) -> Result<Ibtp, ProtocolError> {
        generate_receipt(&ibtp.from, &ibtp.to, ibtp.index, Vec::new(), Vec::new(), typ, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir_04_relay_client::event_to_ibtp;
    use shared_types::{CallFunc, Event};

    const SRC: &str = "1356:appchain1:mychannel&transfer";
    const DST: &str = "1356:appchain2:mychannel&transfer";

    fn request() -> Ibtp {
        let event = Event {
            index: 4,
            dst_full_id: DST.to_string(),
            src_full_id: SRC.to_string(),
            call_func: CallFunc {
                func: "interchainCharge".to_string(),
                args: vec![b"alice".to_vec()],
            },
            ..Default::default()
        };
        event_to_ibtp(&event, 0, 0, Vec::new()).unwrap()
    }

    #[test]
    fn test_inbound_request_targets_local_service() {
        let inbound = SimulatedHub::relay().inbound_request(&request()).unwrap();
        assert_eq!(inbound.service_id, "mychannel&transfer");
        assert_eq!(inbound.from, SRC);
        assert_eq!(inbound.index, 4);
        assert_eq!(inbound.content.func, "interchainCharge");
        assert_eq!(inbound.proof.tx_status, TransactionStatus::Begin);
    }

    #[test]
    fn test_receipt_status_follows_mode() {
        let hub = SimulatedHub::relay();
        let failed = hub.receipt(&request(), IbtpType::ReceiptFailure).unwrap();
        let inbound = hub.inbound_receipt(&failed).unwrap();
        assert_eq!(inbound.to, DST);
        assert_eq!(inbound.service_id, "mychannel&transfer");
        assert_eq!(inbound.proof.tx_status, TransactionStatus::Failure);
        assert_eq!(inbound.result.multi_status, vec![false]);

        let direct = SimulatedHub::direct().inbound_receipt(&failed).unwrap();
        assert_eq!(direct.proof.tx_status, TransactionStatus::Begin);
    }

    #[test]
    fn test_malformed_destination_is_rejected() {
        let mut ibtp = request();
        ibtp.to = "appchain2".to_string();
        assert!(SimulatedHub::relay().inbound_request(&ibtp).is_err());
    }
}
