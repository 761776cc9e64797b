//! # Domain Module
//!
//! Value objects, governance entities, typed requests and the ordering
//! invariants of the broker.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
