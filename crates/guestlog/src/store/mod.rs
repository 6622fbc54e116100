//! Storage layer for guestlog.
//!
//! The whole guest log lives under one key in a [`KeyValueStore`], the same
//! shape a browser's local storage offers. [`RecordStore`] reads and writes
//! that value as a single JSON array; there are no partial writes.
//!
//! Nothing here locks. Two processes doing load-mutate-save against the same
//! backend can lose each other's updates.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::VisitRecord;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Default key the guest log is stored under.
pub const DEFAULT_RECORDS_KEY: &str = "guestLog";

/// A string-to-string store with whole-value writes.
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// The persisted collection of visit records, in creation order.
#[derive(Debug)]
pub struct RecordStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap `backend`, keeping the collection under `key`.
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value backend.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load every record, oldest first.
    ///
    /// A missing or blank value is an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageCorrupt`] if the stored value is not a valid
    /// record array, or a backend error if it cannot be read.
    pub fn load(&self) -> Result<Vec<VisitRecord>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            debug!("No guest log stored under '{}'", self.key);
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<VisitRecord> = serde_json::from_str(&raw).map_err(|source| {
            warn!("Guest log under '{}' is corrupt: {}", self.key, source);
            Error::storage_corrupt(&self.key, source)
        })?;
        debug!("Loaded {} records from '{}'", records.len(), self.key);
        Ok(records)
    }

    /// Replace the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn save(&self, records: &[VisitRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.backend.set(&self.key, &json)?;
        debug!("Saved {} records to '{}'", records.len(), self.key);
        Ok(())
    }

    /// Remove the stored collection. Returns whether anything was stored.
    ///
    /// Does not read the current value, so this works on corrupt data too.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear(&self) -> Result<bool> {
        self.backend.remove(&self.key)
    }
}
