//! # Message Store
//!
//! Outbound events and inbound receipts keyed by (pair, index).
//!
//! Row keys: `out-messages/{pair}/{index:020}` and
//! `receipt-messages/{pair}/{index:020}`, JSON values. Entries are not
//! garbage collected; only a full reset drops them.

use crate::domain::LedgerError;
use crate::ports::StateAccess;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{Event, Receipt};

const OUT_MESSAGES: &str = "out-messages";
const RECEIPT_MESSAGES: &str = "receipt-messages";

fn row_key(table: &str, pair: &str, index: u64) -> String {
    format!("{}/{}/{:020}", table, pair, index)
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(value).map_err(|e| LedgerError::CorruptedState {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::CorruptedState {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Message record access on top of any world state.
pub trait MessageStore: StateAccess {
    /// Store an outbound event under its own pair and index.
    fn put_event(&mut self, event: &Event) -> Result<(), LedgerError> {
        let key = row_key(OUT_MESSAGES, &event.service_pair().key(), event.index);
        let bytes = encode(&key, event)?;
        self.put_state(&key, bytes)
    }

    /// Outbound event at (pair, index).
    fn event(&self, pair: &str, index: u64) -> Result<Option<Event>, LedgerError> {
        let key = row_key(OUT_MESSAGES, pair, index);
        self.get_state(&key)?
            .map(|bytes| decode(&key, &bytes))
            .transpose()
    }

    /// Outbound events of a pair with an index above `after`, ascending.
    fn events_after(&self, pair: &str, after: u64) -> Result<Vec<Event>, LedgerError> {
        let prefix = format!("{}/{}/", OUT_MESSAGES, pair);
        let mut events = Vec::new();
        for (key, bytes) in self.get_state_by_prefix(&prefix)? {
            let event: Event = decode(&key, &bytes)?;
            if event.index > after {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Store an inbound receipt.
    fn put_receipt(&mut self, pair: &str, index: u64, receipt: &Receipt) -> Result<(), LedgerError> {
        let key = row_key(RECEIPT_MESSAGES, pair, index);
        let bytes = encode(&key, receipt)?;
        self.put_state(&key, bytes)
    }

    /// Inbound receipt at (pair, index).
    fn receipt(&self, pair: &str, index: u64) -> Result<Option<Receipt>, LedgerError> {
        let key = row_key(RECEIPT_MESSAGES, pair, index);
        self.get_state(&key)?
            .map(|bytes| decode(&key, &bytes))
            .transpose()
    }

    /// Drop every event and receipt.
    fn clear_messages(&mut self) -> Result<(), LedgerError> {
        for table in [OUT_MESSAGES, RECEIPT_MESSAGES] {
            for (key, _) in self.get_state_by_prefix(&format!("{}/", table))? {
                self.del_state(&key)?;
            }
        }
        Ok(())
    }
}

impl<T: StateAccess + ?Sized> MessageStore for T {}
