//! # Interchain Relay Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── hub.rs            # SimulatedHub standing in for the relay hub
//! ├── benchmarks/       # Criterion benchmarks per subsystem
//! │   ├── ir_03_broker.rs
//! │   └── ir_04_multisign.rs
//! │
//! └── integration/      # Two chains bridged end to end
//!     ├── relay_flows.rs
//!     └── direct_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ir-tests
//!
//! # By category
//! cargo test -p ir-tests integration::relay_flows
//! cargo test -p ir-tests integration::direct_flows
//!
//! # Benchmarks
//! cargo bench -p ir-tests
//! ```

pub mod benchmarks;
pub mod hub;
pub mod integration;

pub use hub::{HubMode, SimulatedHub};
