//! CountingStorage - in-memory storage that counts writes

#![allow(dead_code)]

use turnkeeper::storage::{MemoryStorage, Storage, StorageError};

/// `MemoryStorage` wrapper recording how many times `save` ran
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    saves: usize,
}

impl CountingStorage {
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for CountingStorage {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.saves += 1;
        self.inner.save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}
