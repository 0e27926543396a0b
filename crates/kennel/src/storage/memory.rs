//! In-memory key-value backend.

use std::collections::HashMap;

use crate::error::Result;

use super::KeyValueStore;

/// A key-value area that lives only as long as the value does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a slot exists for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.slots.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = MemoryStore::new();
        store.set("dogs", b"[]").unwrap();
        store.set("cats", b"x").unwrap();

        assert_eq!(store.len(), 2);
        store.remove("cats").unwrap();
        assert!(store.contains_key("dogs"));
        assert!(!store.contains_key("cats"));
    }

    #[test]
    fn test_empty_value_is_present() {
        let mut store = MemoryStore::new();
        store.set("dogs", b"").unwrap();
        assert_eq!(store.get("dogs").unwrap(), Some(Vec::new()));
    }
}
