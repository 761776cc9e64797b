//! # Adapters
//!
//! Storage implementations of the outbound ports.

pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;

pub use memory::{InMemoryKVStore, MemoryState};
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};
