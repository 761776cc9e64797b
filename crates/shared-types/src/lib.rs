//! # Shared Types Crate
//!
//! Wire-level and ledger-level types exchanged between the broker contract,
//! the transaction tracker and the relay client.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every record that crosses a crate boundary
//!   is defined here, with its JSON field names fixed.
//! - **Closed Tags**: message classification uses exhaustive enums
//!   (`IbtpType`, `TransactionStatus`) instead of bare integers.
//! - **Strict Identifiers**: service pairs and service IDs are parsed once and
//!   rejected when malformed.
//!
//! ## Module Structure
//!
//! ```text
//! shared-types/
//! ├── identifiers  # FullServiceId, ServicePair, ChaincodeKey
//! ├── ibtp         # Ibtp, Content, Payload, InvokeResult, BxhProof, tags
//! ├── entities     # Event, Receipt, ChaincodeResponse, BrokerResponse
//! ├── args         # JSON byte-argument lists
//! ├── hashing      # keccak256 helpers
//! └── errors       # ProtocolError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod ibtp;
pub mod identifiers;

pub use args::*;
pub use entities::*;
pub use errors::*;
pub use hashing::*;
pub use ibtp::*;
pub use identifiers::*;
