//! Write overlay used while a transaction is simulated.

use crate::domain::KVStoreError;
use crate::ports::{BatchOperation, KeyValueStore};
use std::collections::BTreeMap;

/// Byte-level state seen by a running transaction.
pub trait RawState {
    /// Read through the overlay.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Buffer a write.
    fn put(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Buffer a delete.
    fn delete(&mut self, key: Vec<u8>);

    /// Prefix scan merging committed rows with buffered writes.
    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// Buffered writes over a committed store.
pub struct TxState<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'s, S: KeyValueStore + ?Sized> TxState<'s, S> {
    /// Start an empty overlay.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered operations.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Turn buffered writes into a batch for `atomic_batch_write`.
    pub fn into_batch(self) -> Vec<BatchOperation> {
        self.writes
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::Put { key, value },
                None => BatchOperation::Delete { key },
            })
            .collect()
    }
}

impl<S: KeyValueStore + ?Sized> RawState for TxState<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self.writes.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.store.get(key),
        }
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, Some(value));
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.writes.insert(key, None);
    }

    fn scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.store.prefix_scan(prefix)?.into_iter().collect();

        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}
