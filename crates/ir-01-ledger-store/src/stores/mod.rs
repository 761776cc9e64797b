//! # Keyed Stores
//!
//! One state row per (family, pair) counter and per (pair, index) message.
//! Both are extension traits over `StateAccess`, so the same code runs on a
//! chaincode stub and on a plain `MemoryState`.

pub mod message;
pub mod sequence;

pub use message::MessageStore;
pub use sequence::SequenceStore;
