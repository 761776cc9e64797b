//! # Inbound Ports
//!
//! What the relay client offers the relay hub side: counters, messages,
//! submissions and chain metadata.

use crate::domain::{
    ChainIds, ClientError, DirectTransactionInfo, InMessage, InboundIbtp, InboundReceipt,
    IndexCategory, InterchainCall, ReceiptCall,
};
use crate::ports::LedgerResponse;
use async_trait::async_trait;
use shared_types::{Appchain, BrokerResponse, Ibtp, SubmitIbtpResponse};
use std::collections::BTreeMap;

/// Read side of the relay client - inbound port.
#[async_trait]
pub trait RelayQueryApi: Send + Sync {
    /// Outbound event counters by service pair.
    async fn get_outer_meta(&self) -> Result<BTreeMap<String, u64>, ClientError>;

    /// Inbound request counters by service pair.
    async fn get_inner_meta(&self) -> Result<BTreeMap<String, u64>, ClientError>;

    /// Receipt counters by service pair.
    async fn get_callback_meta(&self) -> Result<BTreeMap<String, u64>, ClientError>;

    /// Destination rollback counters by service pair.
    async fn get_dst_rollback_meta(&self) -> Result<BTreeMap<String, u64>, ClientError>;

    /// Outbound event as a request IBTP with proof.
    async fn get_out_message(&self, pair: &str, index: u64) -> Result<Ibtp, ClientError>;

    /// Stored inbound receipt with proof.
    async fn get_in_message(&self, pair: &str, index: u64) -> Result<InMessage, ClientError>;

    /// Stored inbound receipt as a receipt IBTP.
    async fn get_receipt_message(&self, pair: &str, index: u64) -> Result<Ibtp, ClientError>;

    /// Approved local services.
    async fn get_services(&self) -> Result<Vec<String>, ClientError>;

    /// Relay hub and application chain IDs.
    async fn get_chain_id(&self) -> Result<ChainIds, ClientError>;

    /// Registered peer chain in direct mode.
    async fn get_appchain_info(&self, chain_id: &str) -> Result<Appchain, ClientError>;

    /// Direct-mode progress of one IBTP.
    async fn get_direct_transaction_meta(
        &self,
        ibtp_id: &str,
    ) -> Result<DirectTransactionInfo, ClientError>;
}

/// Write side of the relay client - inbound port.
///
/// Ledger-mutating calls retry until they succeed, fail with a definitive
/// chaincode error, or a shutdown cancels them.
#[async_trait]
pub trait RelaySubmitApi: Send + Sync {
    /// Deliver one inbound IBTP.
    async fn submit_ibtp(&self, ibtp: InboundIbtp) -> Result<SubmitIbtpResponse, ClientError>;

    /// Deliver several inbound IBTPs in one ledger transaction.
    async fn submit_ibtp_batch(
        &self,
        ibtps: Vec<InboundIbtp>,
    ) -> Result<SubmitIbtpResponse, ClientError>;

    /// Apply a receipt to one of our own events.
    async fn submit_receipt(
        &self,
        receipt: InboundReceipt,
    ) -> Result<SubmitIbtpResponse, ClientError>;

    /// Raw `invokeInterchain` with retry.
    async fn invoke_interchain(
        &self,
        call: &InterchainCall,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError>;

    /// Raw `invokeInterchains` with retry.
    async fn invoke_interchains(
        &self,
        calls: &[InterchainCall],
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError>;

    /// Raw `invokeReceipt` with retry.
    async fn invoke_receipt(
        &self,
        call: &ReceiptCall,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError>;

    /// Raw `invokeIndexUpdate`.
    async fn invoke_index_update(
        &self,
        from: &str,
        to: &str,
        index: u64,
        category: IndexCategory,
    ) -> Result<(LedgerResponse, BrokerResponse), ClientError>;
}
