//! `kennel` - a small local record store for dogs
//!
//! Records are kept in an ordered in-memory collection that is loaded once
//! from a slot of a persistent key-value area and written back in full after
//! every change.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;
pub mod store;

pub use codec::DecodeError;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Dog, RecordCollection};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageStats};
pub use store::{RecordStore, SlotState, DEFAULT_SLOT_KEY};
