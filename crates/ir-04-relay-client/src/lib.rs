//! # IR-04 Relay Client
//!
//! The bridge between the broker chaincode and the relay hub. It polls the
//! broker counters for new outbound events and stored receipts, turns them
//! into IBTPs with proofs, and submits inbound IBTPs and receipts back to
//! the broker.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Delivery Guarantees
//!
//! - Outbound IBTPs leave the poller in index order per service pair
//! - Broker calls that fail in transport are retried every interval until
//!   they succeed or shutdown is signalled
//! - A chaincode failure (`status 500`) is never retried; it comes back to
//!   the hub as a failed `SubmitIbtpResponse`
//!
//! ## Module Structure
//!
//! ```text
//! ir-04-relay-client/
//! ├── domain/     # ClientConfig, IBTP codec, multisign verification, ClientError
//! ├── ports/      # RelayQueryApi, RelaySubmitApi, LedgerClient
//! ├── service/    # RelayClient, Poller, RetryPolicy, ProofFetcher
//! └── adapters/   # InProcessLedgerClient
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InProcessLedgerClient;
pub use domain::{
    event_to_ibtp, generate_callback, generate_receipt, receipt_result, request_content,
    verify_multi_sign, ChainIds, ClientConfig, ClientError, DirectTransactionInfo, InMessage,
    InboundIbtp, InboundReceipt, IndexCategory, InterchainCall, MultiSignError, ReceiptCall,
};
pub use ports::{LedgerClient, LedgerResponse, RelayQueryApi, RelaySubmitApi};
pub use service::{wait_for_shutdown, Poller, ProofFetcher, RelayClient, RetryPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
