//! # Inbound Ports (Driving Ports)
//!
//! What the broker chaincode exposes to local chaincodes, to admins and to
//! the relay client.

use crate::domain::{
    BrokerError, EmitRequest, IndexUpdateRequest, InterchainRequest, ReceiptRequest, VoteOutcome,
    VoteStatus,
};
use ir_01_ledger_store::CounterFamily;
use shared_types::{Appchain, ChaincodeKey, DirectTransactionMeta, Event, Receipt};
use std::collections::BTreeMap;

/// Sequencing and routing of interchain traffic.
pub trait InterchainApi {
    /// Assign the next outer index of (caller, destination) and store the event.
    fn emit_interchain_event(&mut self, request: EmitRequest) -> Result<Event, BrokerError>;

    /// Deliver one inbound call or acknowledgement. Returns the target's payload.
    fn invoke_interchain(&mut self, request: InterchainRequest) -> Result<Vec<u8>, BrokerError>;

    /// Deliver several calls in order; the first failure fails all of them.
    fn invoke_interchains(&mut self, requests: Vec<InterchainRequest>) -> Result<(), BrokerError>;

    /// Apply a receipt to one of our own events by running its callback
    /// or rollback. Returns the payload of that call.
    fn invoke_receipt(&mut self, request: ReceiptRequest) -> Result<Vec<u8>, BrokerError>;

    /// Advance one counter family without invoking anything.
    fn invoke_index_update(&mut self, request: IndexUpdateRequest) -> Result<(), BrokerError>;
}

/// Admins, thresholds and the local chaincode whitelist.
pub trait GovernanceApi {
    /// First-time setup: creator plus `extra_admins` become admins.
    fn bootstrap(
        &mut self,
        extra_admins: &[String],
        admin_threshold: Option<u64>,
    ) -> Result<(), BrokerError>;

    /// Reset all broker state and set the chain identity and mode.
    fn initialize(
        &mut self,
        bxh_id: &str,
        appchain_id: &str,
        val_threshold: u64,
    ) -> Result<(), BrokerError>;

    /// Open a proposal for the calling chaincode. Returns its `channel&name` key.
    fn register(&mut self, ordered: bool) -> Result<String, BrokerError>;

    /// Cast the creator's vote on a registration proposal.
    fn audit(&mut self, target: &ChaincodeKey, status: VoteStatus)
        -> Result<VoteOutcome, BrokerError>;

    /// Whether an MSP id is an admin.
    fn is_admin(&self, msp_id: &str) -> Result<bool, BrokerError>;

    /// Whether a `channel&name` key is whitelisted.
    fn is_whitelisted(&self, key: &str) -> Result<bool, BrokerError>;
}

/// Read-only views used by the relay client and operators.
pub trait BrokerQueryApi {
    /// Snapshot of one counter family.
    fn meta(&self, family: CounterFamily) -> Result<BTreeMap<String, u64>, BrokerError>;

    /// Outbound event at (pair, index).
    fn out_message(&self, pair: &str, index: u64) -> Result<Event, BrokerError>;

    /// Inbound receipt at (pair, index).
    fn in_message(&self, pair: &str, index: u64) -> Result<Receipt, BrokerError>;

    /// `{bxhID}-{appchainID}`.
    fn chain_id(&self) -> Result<String, BrokerError>;

    /// Full IDs of approved local chaincodes, in approval order.
    fn local_services(&self) -> Result<Vec<String>, BrokerError>;
}

/// Direct-mode registry and saga state, held by the transaction tracker.
pub trait DirectModeApi {
    /// Register a peer appchain. Returns the tracker's confirmation.
    fn register_appchain(
        &mut self,
        chain_id: &str,
        broker: &str,
        trust_root: &str,
        rule_addr: &str,
    ) -> Result<Vec<u8>, BrokerError>;

    /// Register a remote service with a `^`-separated caller ban list.
    fn register_remote_service(
        &mut self,
        chain_id: &str,
        service_id: &str,
        ban_list: &str,
    ) -> Result<(), BrokerError>;

    /// Registered peer appchain.
    fn appchain_info(&mut self, chain_id: &str) -> Result<Appchain, BrokerError>;

    /// Full IDs of registered remote services.
    fn remote_services(&mut self) -> Result<Vec<String>, BrokerError>;

    /// Callers banned from a remote service; empty when unregistered.
    fn remote_ban_list(&mut self, full_service_id: &str) -> Result<Vec<String>, BrokerError>;

    /// Saga start time and status of one IBTP.
    fn direct_transaction_meta(&mut self, ibtp_id: &str)
        -> Result<DirectTransactionMeta, BrokerError>;
}
