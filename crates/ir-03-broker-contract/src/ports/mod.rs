//! # Ports Module
//!
//! Driving ports of the broker. All of them run inside one ledger
//! transaction against the broker's own state.

pub mod inbound;

pub use inbound::*;
