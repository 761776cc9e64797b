//! # Adapters
//!
//! Chaincode entry point of the tracker.

pub mod chaincode;

pub use chaincode::{TransactionContract, TRANSACTION_CONTRACT_NAME};
