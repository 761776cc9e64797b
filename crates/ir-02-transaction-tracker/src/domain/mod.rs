//! # Domain Module
//!
//! Status machine and errors of the tracker.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
