//! # Domain Invariants
//!
//! Ordering rules enforced before any counter moves.

use crate::domain::errors::BrokerError;

/// Strict sequencing: `index` must be exactly one past the counter.
///
/// Accepting `index` is what allows the counter to advance, so an index is
/// never accepted twice and never skipped.
pub fn invariant_next_index(
    family: &'static str,
    counter: u64,
    index: u64,
) -> Result<(), BrokerError> {
    let expected = counter
        .checked_add(1)
        .ok_or(BrokerError::IndexExhausted { family })?;
    if index != expected {
        return Err(BrokerError::IncorrectIndex { family, expected });
    }
    Ok(())
}

/// Destination rollbacks may skip ahead but never go backwards.
pub fn invariant_rollback_forward(counter: u64, index: u64) -> Result<(), BrokerError> {
    let expected = counter.checked_add(1).ok_or(BrokerError::IndexExhausted {
        family: "dstRollback",
    })?;
    if index < expected {
        return Err(BrokerError::IncorrectDstRollbackIndex { expected });
    }
    Ok(())
}
