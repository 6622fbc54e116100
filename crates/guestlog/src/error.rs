//! Error types for guestlog.
//!
//! This module defines all error types used throughout the guestlog crate.
//! Ledger errors carry messages meant to be shown to the guest at the kiosk;
//! the rest are operator-facing.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for guestlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Ledger Errors ===
    /// Submitted input failed validation. Nothing was written.
    #[error("{message}")]
    Validation {
        /// Corrective message for the person at the kiosk.
        message: String,
    },

    /// A sign-out name did not match any open visit. Nothing was written.
    ///
    /// The same message covers "already signed out" and "never signed in".
    #[error("name not recognized as signed in; check the spelling or ask the front desk")]
    NotFound,

    // === Storage Errors ===
    /// The persisted collection is not a valid record array.
    #[error("stored guest log under key '{key}' is corrupt: {source}")]
    StorageCorrupt {
        /// Key holding the collection.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for guestlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a storage corruption error for the given key.
    #[must_use]
    pub fn storage_corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::StorageCorrupt {
            key: key.into(),
            source,
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is an input validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is an unmatched sign-out.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this error indicates corrupt persisted data.
    #[must_use]
    pub fn is_storage_corrupt(&self) -> bool {
        matches!(self, Self::StorageCorrupt { .. })
    }

    /// Check if the person at the kiosk can fix this by correcting input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_validation() || self.is_not_found()
    }
}
