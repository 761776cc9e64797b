//! # Ports Layer
//!
//! Typed APIs of the tracker, consumed by the broker contract.

pub mod inbound;

pub use inbound::*;
