//! # IR-01 Ledger Store
//!
//! Persistent state underneath the broker: a key-value port, an in-process
//! chaincode host with transactional commits, and the keyed Sequence and
//! Message stores the broker sequences interchain traffic with.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Transaction Model
//!
//! | Step | Behaviour |
//! |------|-----------|
//! | Simulate | Chaincode runs against a write overlay on top of the store |
//! | Nested calls | `invoke_chaincode` shares the same overlay |
//! | Commit | Overlay flushed with one atomic batch iff status < 400 |
//! | Serialization | One transaction at a time behind a single lock |
//!
//! ## Module Structure
//!
//! ```text
//! ir-01-ledger-store/
//! ├── domain/     # CounterFamily, TxContext, TransactionRecord, errors
//! ├── ports/      # KeyValueStore, StateAccess, Chaincode
//! ├── adapters/   # InMemoryKVStore, MemoryState, RocksDbStore
//! ├── ledger/     # TxState overlay, ChaincodeStub, InProcessLedger
//! └── stores/     # SequenceStore, MessageStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ledger;
pub mod ports;
pub mod stores;

// Re-exports
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use adapters::{InMemoryKVStore, MemoryState};
pub use domain::{
    CounterFamily, KVStoreError, LedgerError, TransactionRecord, TxContext, MAX_CALL_DEPTH,
};
pub use ledger::{ChaincodeRegistry, ChaincodeStub, InProcessLedger, Proposal, TxResponse};
pub use ports::{BatchOperation, Chaincode, KeyValueStore, StateAccess};
pub use stores::{MessageStore, SequenceStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
