//! Core record types for kennel.
//!
//! This module defines the dog record and the ordered collection the store
//! keeps in memory.

use serde::{Deserialize, Serialize};

/// An ordered collection of records.
///
/// Insertion order is preserved and duplicates are permitted.
pub type RecordCollection = Vec<Dog>;

/// A single dog record.
///
/// The persisted field names are declared explicitly so the encoded form
/// stays `name` then `breed` even if the Rust fields are renamed. Unknown
/// keys in stored data are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dog {
    /// The dog's name. Also used as the rendering identity.
    #[serde(rename = "name")]
    pub name: String,

    /// The dog's breed.
    #[serde(rename = "breed")]
    pub breed: String,
}

impl Dog {
    /// Create a new record.
    #[must_use]
    pub fn new(name: impl Into<String>, breed: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breed: breed.into(),
        }
    }

    /// The identity used when rendering lists.
    ///
    /// Not unique: two dogs with the same name share an identity.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Dog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is a {}", self.name, self.breed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let dog = Dog::new("Rex", "Lab");
        assert_eq!(dog.name, "Rex");
        assert_eq!(dog.breed, "Lab");
    }

    #[test]
    fn test_id_is_name() {
        let dog = Dog::new("Fido", "Pug");
        assert_eq!(dog.id(), "Fido");
    }

    #[test]
    fn test_duplicate_names_share_identity() {
        let a = Dog::new("Rex", "Lab");
        let b = Dog::new("Rex", "Beagle");
        assert_eq!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let dog = Dog::new("Rex", "Lab");
        assert_eq!(dog.to_string(), "Rex is a Lab");
    }

    #[test]
    fn test_display_empty_fields() {
        let dog = Dog::new("", "");
        assert_eq!(dog.to_string(), " is a ");
    }

    #[test]
    fn test_clone_eq() {
        let dog = Dog::new("Rex", "Lab");
        assert_eq!(dog.clone(), dog);
    }
}
