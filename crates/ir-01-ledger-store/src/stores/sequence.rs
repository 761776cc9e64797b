//! # Sequence Store
//!
//! Monotonic counters keyed by service pair, one row per pair and family.
//!
//! Row key: `{family}/{pair}`; value: 8-byte big-endian. Absent rows read
//! as zero.

use crate::domain::{CounterFamily, LedgerError};
use crate::ports::StateAccess;
use std::collections::BTreeMap;

fn row_key(family: CounterFamily, pair: &str) -> String {
    format!("{}/{}", family.key(), pair)
}

fn family_prefix(family: CounterFamily) -> String {
    format!("{}/", family.key())
}

fn decode_counter(key: &str, bytes: &[u8]) -> Result<u64, LedgerError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| LedgerError::CorruptedState {
        key: key.to_string(),
        message: format!("expected 8 bytes, found {}", bytes.len()),
    })?;
    Ok(u64::from_be_bytes(raw))
}

/// Counter access on top of any world state.
pub trait SequenceStore: StateAccess {
    /// Current value, zero when absent.
    fn counter(&self, family: CounterFamily, pair: &str) -> Result<u64, LedgerError> {
        let key = row_key(family, pair);
        match self.get_state(&key)? {
            Some(bytes) => decode_counter(&key, &bytes),
            None => Ok(0),
        }
    }

    /// Overwrite the value.
    fn set_counter(
        &mut self,
        family: CounterFamily,
        pair: &str,
        value: u64,
    ) -> Result<(), LedgerError> {
        self.put_state(&row_key(family, pair), value.to_be_bytes().to_vec())
    }

    /// Add one and return the new value.
    fn bump_counter(&mut self, family: CounterFamily, pair: &str) -> Result<u64, LedgerError> {
        let next = self
            .counter(family, pair)?
            .checked_add(1)
            .ok_or_else(|| LedgerError::CounterOverflow(row_key(family, pair)))?;
        self.set_counter(family, pair, next)?;
        Ok(next)
    }

    /// Every pair of a family, ordered by pair key.
    fn counters(&self, family: CounterFamily) -> Result<BTreeMap<String, u64>, LedgerError> {
        let prefix = family_prefix(family);
        self.get_state_by_prefix(&prefix)?
            .into_iter()
            .map(|(key, value)| {
                let counter = decode_counter(&key, &value)?;
                Ok((key[prefix.len()..].to_string(), counter))
            })
            .collect()
    }

    /// Remove every row of a family.
    fn clear_counters(&mut self, family: CounterFamily) -> Result<(), LedgerError> {
        for (key, _) in self.get_state_by_prefix(&family_prefix(family))? {
            self.del_state(&key)?;
        }
        Ok(())
    }
}

impl<T: StateAccess + ?Sized> SequenceStore for T {}
