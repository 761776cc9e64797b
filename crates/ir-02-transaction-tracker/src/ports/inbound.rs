//! # Inbound Ports (Driving Ports)
//!
//! Both APIs operate on the state of the currently executing chaincode.
//! Every mutating call validates its precondition before writing.

use crate::domain::{DirectTxStatus, TrackerError};
use shared_types::Appchain;

/// Direct-mode status machine keyed by IBTP id.
pub trait TransactionStatusApi {
    /// Record `Begin` and the start time. Fails if the id already has a status.
    fn start_transaction(&mut self, ibtp_id: &str, now: u64) -> Result<(), TrackerError>;

    /// `Begin` to `RollbackBegin`.
    fn rollback_transaction(&mut self, ibtp_id: &str) -> Result<(), TrackerError>;

    /// `Begin` to `Success`.
    fn end_transaction_success(&mut self, ibtp_id: &str) -> Result<(), TrackerError>;

    /// `Begin` to `Fail`.
    fn end_transaction_fail(&mut self, ibtp_id: &str) -> Result<(), TrackerError>;

    /// `RollbackBegin` to `RollbackEnd`.
    fn end_transaction_rollback(&mut self, ibtp_id: &str) -> Result<(), TrackerError>;

    /// Current status; `Unset` for unknown ids.
    fn transaction_status(&self, ibtp_id: &str) -> Result<DirectTxStatus, TrackerError>;

    /// Start time in unix seconds; 0 for unknown ids.
    fn start_timestamp(&self, ibtp_id: &str) -> Result<u64, TrackerError>;
}

/// Registry of peer appchains and of remote services allowed to call in.
pub trait AppchainRegistryApi {
    /// Register a peer appchain. Registration is final.
    fn register_appchain(
        &mut self,
        chain_id: &str,
        broker: &str,
        trust_root: &str,
        rule_addr: &str,
    ) -> Result<(), TrackerError>;

    /// Registered appchain by id.
    fn appchain(&self, chain_id: &str) -> Result<Appchain, TrackerError>;

    /// Register (or replace) a remote service and its caller ban list.
    fn register_remote_service(
        &mut self,
        chain_id: &str,
        service_id: &str,
        ban_list: Vec<String>,
    ) -> Result<(), TrackerError>;

    /// Sorted full ids of all registered remote services.
    fn remote_services(&self) -> Result<Vec<String>, TrackerError>;

    /// Ban list of a remote service, `None` if it was never registered.
    fn remote_ban_list(&self, full_service_id: &str) -> Result<Option<Vec<String>>, TrackerError>;

    /// Drop every status, timestamp, appchain and remote-service row.
    fn reset(&mut self) -> Result<(), TrackerError>;
}
