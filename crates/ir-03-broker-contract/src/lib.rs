//! # IR-03 Broker Contract
//!
//! The on-ledger endpoint of interchain traffic. Application chaincodes emit
//! interchain events through it, the relay client delivers requests and
//! receipts to it, and it keeps the per-pair sequence counters that make
//! every delivery exactly-once.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Counter Families
//!
//! | Family      | Advanced by                    | Rule             |
//! |-------------|--------------------------------|------------------|
//! | outer       | `EmitInterchainEvent`          | +1 per event     |
//! | inner       | `invokeInterchain` (request)   | exactly next     |
//! | callback    | `invokeReceipt`                | exactly next     |
//! | dstRollback | `invokeInterchain` (ack)       | never backwards  |
//!
//! ## Modes
//!
//! A validator threshold of zero switches the broker to direct mode: peer
//! chains talk to each other without a relay hub and the transaction
//! tracker chaincode records every saga.
//!
//! ## Module Structure
//!
//! ```text
//! ir-03-broker-contract/
//! ├── domain/     # RegistrationProposal, requests, Mode, IndexFamily, BrokerError
//! ├── ports/      # InterchainApi, GovernanceApi, BrokerQueryApi, DirectModeApi
//! ├── service/    # BrokerService over the chaincode stub
//! └── adapters/   # BrokerContract and the sample TransferContract
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{BrokerContract, TransferContract, BROKER_CONTRACT_NAME, TRANSFER_CONTRACT_NAME};
pub use domain::{
    BrokerError, EmitRequest, IndexFamily, IndexUpdateRequest, InterchainRequest, Mode, RegistrationProposal,
    ReceiptRequest, VoteOutcome, VoteStatus,
};
pub use ports::{BrokerQueryApi, DirectModeApi, GovernanceApi, InterchainApi};
pub use service::BrokerService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
