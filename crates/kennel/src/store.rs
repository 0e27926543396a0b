//! The record store.
//!
//! A [`RecordStore`] owns the in-memory record collection and mirrors it into
//! one slot of a [`KeyValueStore`]. The collection is read from the slot once,
//! when the store is opened, and the whole collection is written back after
//! every mutation. Memory is authoritative: a slot that is missing, cannot be
//! read, or holds malformed data simply yields an empty collection.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::codec::{self, DecodeError};
use crate::error::{Error, Result};
use crate::record::{Dog, RecordCollection};
use crate::storage::KeyValueStore;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT_KEY: &str = "dogs";

/// What a slot currently holds.
#[derive(Debug)]
pub enum SlotState {
    /// No value is stored under the key.
    Absent,
    /// The slot holds a well-formed collection (possibly empty).
    Present {
        /// The decoded records.
        records: RecordCollection,
    },
    /// The slot holds bytes that do not decode.
    Corrupt {
        /// Why decoding failed.
        error: DecodeError,
    },
}

impl SlotState {
    /// Short label for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present { .. } => "present",
            Self::Corrupt { .. } => "corrupt",
        }
    }
}

/// Read and decode a slot without any fallback.
///
/// # Errors
///
/// Returns an error if the backend read fails or the stored bytes do not
/// decode.
pub fn read_slot<S>(kv: &S, key: &str) -> Result<Option<RecordCollection>>
where
    S: KeyValueStore + ?Sized,
{
    match kv.get(key)? {
        None => Ok(None),
        Some(bytes) => {
            debug!("Read {} bytes from slot '{}'", bytes.len(), key);
            Ok(Some(codec::decode(&bytes)?))
        }
    }
}

/// Inspect a slot for diagnostics.
///
/// # Errors
///
/// Returns an error only if the backend itself cannot be read; malformed
/// data is reported as [`SlotState::Corrupt`].
pub fn slot_state<S>(kv: &S, key: &str) -> Result<SlotState>
where
    S: KeyValueStore + ?Sized,
{
    match read_slot(kv, key) {
        Ok(None) => Ok(SlotState::Absent),
        Ok(Some(records)) => Ok(SlotState::Present { records }),
        Err(Error::Decode(error)) => Ok(SlotState::Corrupt { error }),
        Err(e) => Err(e),
    }
}

/// Load the collection stored under `key`, falling back to empty.
#[must_use]
pub fn load<S>(kv: &S, key: &str) -> RecordCollection
where
    S: KeyValueStore + ?Sized,
{
    match read_slot(kv, key) {
        Ok(Some(records)) => records,
        Ok(None) => {
            debug!("Slot '{}' is absent, starting empty", key);
            RecordCollection::new()
        }
        Err(e) => {
            debug!("Slot '{}' unusable ({}), starting empty", key, e);
            RecordCollection::new()
        }
    }
}

/// An ordered record collection mirrored into a key-value slot.
#[derive(Debug)]
pub struct RecordStore<S: KeyValueStore> {
    backend: S,
    key: String,
    records: RecordCollection,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Open the store on the default `"dogs"` slot.
    #[must_use]
    pub fn open(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    /// Open the store on a specific slot, loading whatever it holds.
    #[must_use]
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = load(&backend, &key);
        debug!("Loaded {} records from slot '{}'", records.len(), key);
        Self {
            backend,
            key,
            records,
        }
    }

    /// The current records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Dog] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The slot key this store persists to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value area.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Give back the key-value area, dropping the in-memory collection.
    #[must_use]
    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Append a record and persist. Fields are not validated.
    pub fn append(&mut self, record: Dog) {
        self.records.push(record);
        self.persist();
    }

    /// Append a record built from its fields and persist.
    pub fn add(&mut self, name: impl Into<String>, breed: impl Into<String>) {
        self.append(Dog::new(name, breed));
    }

    /// Remove the records at `positions` and persist.
    ///
    /// Positions refer to the collection as it was before the call, so
    /// removing `{0, 2}` from `[A, B, C]` leaves `[B]`. Positions past the
    /// end are ignored. Returns how many records were removed.
    pub fn delete_at<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let len = self.records.len();
        let doomed: BTreeSet<usize> = positions.into_iter().filter(|&p| p < len).collect();

        let mut index = 0;
        self.records.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });

        self.persist();
        doomed.len()
    }

    /// Clear the collection and remove the slot entirely.
    pub fn delete_all(&mut self) {
        let removed = self.records.len();
        self.records.clear();
        match self.backend.remove(&self.key) {
            Ok(_) => info!("Cleared {} records and removed slot '{}'", removed, self.key),
            Err(e) => warn!("Failed to remove slot '{}': {}", self.key, e),
        }
    }

    fn persist(&mut self) {
        let encoded = match codec::encode(&self.records) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode slot '{}', leaving it unchanged: {}", self.key, e);
                return;
            }
        };
        debug!(
            "Persisting slot '{}': {}",
            self.key,
            String::from_utf8_lossy(&encoded)
        );
        if let Err(e) = self.backend.set(&self.key, &encoded) {
            warn!("Failed to persist slot '{}': {}", self.key, e);
        }
    }
}
