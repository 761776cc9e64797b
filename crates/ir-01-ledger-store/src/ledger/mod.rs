//! # Chaincode Host
//!
//! Executes chaincode proposals against a write overlay and commits the
//! overlay atomically.

pub mod in_process;
pub mod overlay;
pub mod stub;

pub use in_process::{InProcessLedger, Proposal, TxResponse};
pub use overlay::{RawState, TxState};
pub use stub::{ChaincodeRegistry, ChaincodeStub};
