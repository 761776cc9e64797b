//! # Relay Client - Queries
//!
//! Counter snapshots, message reads with proofs, and chain metadata.

use super::*;
use crate::domain::{event_to_ibtp, generate_receipt, DirectTransactionInfo, InMessage};
use crate::ports::RelayQueryApi;
use async_trait::async_trait;
use shared_types::{Appchain, DirectTransactionMeta, Event, Ibtp, Receipt, ServicePair};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

impl RelayClient {
    /// Read the chain ID pair from the broker and replace the cached copy.
    pub(crate) async fn refresh_chain_id(&self) -> Result<ChainIds, ClientError> {
        let response = self.ledger.query("getChainId", Vec::new()).await?;
        let raw = String::from_utf8_lossy(&response.payload).into_owned();
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() != 2 {
            return Err(ClientError::InvalidChainId(raw));
        }
        let ids = ChainIds {
            bxh_id: parts[0].to_string(),
            appchain_id: parts[1].to_string(),
        };
        *self.chain_ids.write() = Some(ids.clone());
        Ok(ids)
    }

    async fn meta(&self, function: &str) -> Result<BTreeMap<String, u64>, ClientError> {
        let response = self.ledger.query(function, Vec::new()).await?;
        if response.payload.is_empty() {
            return Ok(BTreeMap::new());
        }
        decode_json("meta", &response.payload)
    }
}

fn pair_args(pair: &str, index: u64) -> Vec<Vec<u8>> {
    vec![pair.as_bytes().to_vec(), index.to_string().into_bytes()]
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl RelayQueryApi for RelayClient {
    async fn get_outer_meta(&self) -> Result<BTreeMap<String, u64>, ClientError> {
        self.meta("getOuterMeta").await
    }

    async fn get_inner_meta(&self) -> Result<BTreeMap<String, u64>, ClientError> {
        self.meta("getInnerMeta").await
    }

    async fn get_callback_meta(&self) -> Result<BTreeMap<String, u64>, ClientError> {
        self.meta("getCallbackMeta").await
    }

    async fn get_dst_rollback_meta(&self) -> Result<BTreeMap<String, u64>, ClientError> {
        self.meta("getDstRollbackMeta").await
    }

    async fn get_out_message(&self, pair: &str, index: u64) -> Result<Ibtp, ClientError> {
        let response = self.ledger.execute("getOutMessage", pair_args(pair, index)).await?;
        let event = Event::from_json(&response.payload)
            .map_err(|e| ClientError::decode("event", e))?;
        let proof = self.proofs.fetch(&response.tx_id).await;
        debug!("[ir-04] Read out message {} #{}", pair, index);
        Ok(event_to_ibtp(
            &event,
            self.config.timeout_height,
            unix_nanos(),
            proof,
        )?)
    }

    async fn get_in_message(&self, pair: &str, index: u64) -> Result<InMessage, ClientError> {
        let response = self.ledger.execute("getInMessage", pair_args(pair, index)).await?;
        let receipt = Receipt::from_json(&response.payload)
            .map_err(|e| ClientError::decode("receipt", e))?;
        let proof = self.proofs.fetch(&response.tx_id).await;

        let results = if receipt.result.payload.is_empty() {
            Vec::new()
        } else {
            vec![receipt.result.payload.clone()]
        };
        Ok(InMessage {
            success: receipt.result.is_ok(),
            results,
            proof,
            encrypt: receipt.encrypt,
            typ: receipt.typ,
        })
    }

    async fn get_receipt_message(&self, pair: &str, index: u64) -> Result<Ibtp, ClientError> {
        let message = self.get_in_message(pair, index).await?;
        let pair = ServicePair::parse(pair)?;
        Ok(generate_receipt(
            &pair.from,
            &pair.to,
            index,
            message.results,
            message.proof,
            message.typ,
            message.encrypt,
        )?)
    }

    async fn get_services(&self) -> Result<Vec<String>, ClientError> {
        let response = self.ledger.query("getLocalServices", Vec::new()).await?;
        if response.payload.is_empty() {
            return Ok(Vec::new());
        }
        decode_json("local services", &response.payload)
    }

    async fn get_chain_id(&self) -> Result<ChainIds, ClientError> {
        if let Some(ids) = self.chain_ids.read().clone() {
            return Ok(ids);
        }
        self.refresh_chain_id().await
    }

    async fn get_appchain_info(&self, chain_id: &str) -> Result<Appchain, ClientError> {
        let response = self
            .ledger
            .query("getAppchainInfo", vec![chain_id.as_bytes().to_vec()])
            .await?;
        decode_json("appchain", &response.payload)
    }

    async fn get_direct_transaction_meta(
        &self,
        ibtp_id: &str,
    ) -> Result<DirectTransactionInfo, ClientError> {
        let response = self
            .ledger
            .query("getDirectTransactionMeta", vec![ibtp_id.as_bytes().to_vec()])
            .await?;
        let meta: DirectTransactionMeta =
            decode_json("direct transaction meta", &response.payload)?;
        Ok(DirectTransactionInfo {
            start_timestamp: meta.start_timestamp,
            timeout_period: self.config.timeout_period,
            status: meta.transaction_status,
        })
    }
}
