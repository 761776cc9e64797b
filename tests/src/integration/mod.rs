//! # Integration Flows
//!
//! Two chains, each a full relay node over its own in-process ledger,
//! bridged by a `SimulatedHub`.
//!
//! ## Flows Tested:
//!
//! 1. **Request → Receipt**: an event on chain A runs on chain B, and B's
//!    receipt settles A's callback counter
//! 2. **Failure → Rollback**: a failed call on B refunds the sender on A
//! 3. **Timeout Rollback**: the hub undoes an applied request on B
//! 4. **Direct Mode**: the same loop with no hub, tracked by each broker's
//!    transaction tracker

#[cfg(test)]
mod fixtures;

pub mod direct_flows;
pub mod relay_flows;
