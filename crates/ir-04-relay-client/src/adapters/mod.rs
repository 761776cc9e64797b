//! # Adapters
//!
//! `LedgerClient` implementations.

pub mod in_process;

pub use in_process::InProcessLedgerClient;
