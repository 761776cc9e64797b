//! # Adapters
//!
//! Chaincode surfaces deployed on the ledger host.
//!
//! - `BrokerContract`: the broker itself
//! - `TransferContract`: sample application used by end-to-end flows

pub mod broker;
pub mod transfer;

pub use broker::{BrokerContract, BROKER_CONTRACT_NAME};
pub use transfer::{TransferContract, TRANSFER_CONTRACT_NAME};
