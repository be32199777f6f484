//! Process-local slot store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{KeyValueStore, StorageError};

/// Slots held in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the slots currently written.
    pub fn slot_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock("*")?.keys().cloned().collect())
    }

    fn lock(&self, slot: &str) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.slots
            .lock()
            .map_err(|_| StorageError::read(slot, "in-memory store lock poisoned"))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock(slot)?.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.lock(slot)?.insert(slot.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        self.lock(slot)?.remove(slot);
        Ok(())
    }
}
