//! # Relay Node
//!
//! The relay plugin process: configuration, logging, runtime wiring and
//! the multi-signature verification service.
//!
//! ## Module Structure
//!
//! ```text
//! relay-node/
//! ├── config.rs   # RelayConfig, relay.toml, FABRIC_ overrides
//! ├── logging.rs  # tracing subscriber setup
//! ├── http.rs     # POST /v1/verify
//! └── runtime.rs  # RelayNode: bootstrap, poller, shutdown
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, RelayConfig};
pub use logging::{init_logging, LogFormat};
pub use runtime::{RelayNode, RunningRelay, RuntimeError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
