//! # IR-02 Transaction Status Tracker
//!
//! Saga bookkeeping for direct mode, where no validator set signs off on
//! interchain calls. Each IBTP id moves through a small status machine and
//! every transition checks its predecessor.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Status Machine
//!
//! ```text
//! Unset ──start──→ Begin ──endSuccess──→ Success
//!                    │ └──endFail─────→ Fail
//!                    └──rollback──→ RollbackBegin ──endRollback──→ RollbackEnd
//! ```
//!
//! The same chaincode owns the registry of peer appchains and of the remote
//! services allowed to call in, with a per-service caller ban list.
//!
//! ## Module Structure
//!
//! ```text
//! ir-02-transaction-tracker/
//! ├── domain/     # DirectTxStatus, TrackerError
//! ├── ports/      # TransactionStatusApi, AppchainRegistryApi
//! ├── service.rs  # TransactionTracker over ledger state
//! └── adapters/   # TransactionContract chaincode
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{TransactionContract, TRANSACTION_CONTRACT_NAME};
pub use domain::{remote_full_service_id, DirectTxStatus, TrackerError, BAN_LIST_SEPARATOR};
pub use ports::{AppchainRegistryApi, TransactionStatusApi};
pub use service::TransactionTracker;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
