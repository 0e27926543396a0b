//! Persistent key-value area for kennel.
//!
//! The record store only needs three operations from its backing area:
//! read a slot, overwrite a slot, and remove a slot. [`KeyValueStore`] is that
//! seam. Two backends are provided:
//!
//! - [`SqliteStore`]: a durable `SQLite` file, used by the `kennel` binary.
//! - [`MemoryStore`]: a process-local map, used in tests and for injection.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StorageStats};

use crate::error::Result;

/// A string-keyed store of opaque byte values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove the slot for `key`.
    ///
    /// Returns `true` if a slot was removed, `false` if it was already absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(kv: &mut dyn KeyValueStore) {
        assert_eq!(kv.get("a").unwrap(), None);
        kv.set("a", b"one").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some(b"one".to_vec()));
        kv.set("a", b"two").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some(b"two".to_vec()));
        assert!(kv.remove("a").unwrap());
        assert!(!kv.remove("a").unwrap());
        assert_eq!(kv.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_backend_contract() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_sqlite_backend_contract() {
        exercise(&mut SqliteStore::open_in_memory().unwrap());
    }

    fn put_through<S: KeyValueStore>(mut kv: S) {
        kv.set("k", b"v").unwrap();
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut store = MemoryStore::new();
        put_through(&mut store);
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }
}
