//! # Domain Layer
//!
//! Pure relay client logic: request and result shapes, errors,
//! configuration, the IBTP codec and multi-signature checking. No I/O.

pub mod codec;
pub mod config;
pub mod entities;
pub mod errors;
pub mod multisign;

pub use codec::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use multisign::*;
