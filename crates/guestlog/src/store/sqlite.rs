//! `SQLite` key-value backend.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{migrations, KeyValueStore};

const MEMORY_PATH: &str = ":memory:";

/// A [`KeyValueStore`] backed by a single-file `SQLite` database.
///
/// Each `set` is one `INSERT ... ON CONFLICT` statement, so a value is
/// replaced atomically or not at all.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories as needed and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created, or
    /// schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Every save must survive a power cut.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;
        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the database file in bytes; 0 for in-memory databases.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        if self.path.as_os_str() == MEMORY_PATH {
            0
        } else {
            std::fs::metadata(&self.path).map_or(0, |m| m.len())
        }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!("Wrote {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test store")
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path(), Path::new(":memory:"));
        assert_eq!(store.file_size(), 0);
    }

    #[test]
    fn test_get_missing() {
        let store = create_test_store();
        assert!(store.get("guestLog").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let store = create_test_store();
        store.set("guestLog", "[]").unwrap();
        assert_eq!(store.get("guestLog").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_overwrites() {
        let store = create_test_store();
        store.set("guestLog", "[1]").unwrap();
        store.set("guestLog", "[2]").unwrap();
        assert_eq!(store.get("guestLog").unwrap().as_deref(), Some("[2]"));

        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_remove() {
        let store = create_test_store();
        store.set("guestLog", "[]").unwrap();
        assert!(store.remove("guestLog").unwrap());
        assert!(!store.remove("guestLog").unwrap());
        assert!(store.get("guestLog").unwrap().is_none());
    }

    #[test]
    fn test_open_file_persists_across_connections() {
        let dir = std::env::temp_dir().join(format!("guestlog-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("guestlog.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("guestLog", "[]").unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("guestLog").unwrap().as_deref(), Some("[]"));
        assert!(reopened.file_size() > 0);

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
