//! # Ports Module
//!
//! Hexagonal architecture ports (chaincode surface, storage dependencies).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
