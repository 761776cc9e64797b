//! # Inbound Ports
//!
//! What a chaincode deployed on the host must implement.

use crate::ledger::ChaincodeStub;
use shared_types::ChaincodeResponse;

/// A deployable contract.
///
/// Both entrypoints run inside a ledger transaction; state written through
/// the stub is committed only when the returned status is below 400.
pub trait Chaincode: Send + Sync {
    /// Called once when the chaincode is deployed.
    fn init(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse;

    /// Called for every proposal targeting this chaincode.
    fn invoke(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse;
}
