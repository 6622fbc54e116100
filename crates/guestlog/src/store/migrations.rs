//! Schema versioning for the `SQLite` backend.
//!
//! The version lives in the `metadata` table. Each migration is a batch of SQL
//! applied in order inside one transaction with the version bump.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Ordered migrations: `(version, sql)`. Version 1 is the base schema.
const MIGRATIONS: &[(i32, &str)] = &[(1, "")];

/// The schema version this build expects.
pub const CURRENT_VERSION: i32 = MIGRATIONS[MIGRATIONS.len() - 1].0;

/// Create the base tables and bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if the schema cannot be created, the stored version is
/// unreadable, or the database is newer than this build.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    let tx = conn.transaction()?;
    for (target, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > version) {
        if !sql.is_empty() {
            tx.execute_batch(sql)?;
        }
        set_schema_version(&tx, *target)?;
        info!("Migrated guest log database to schema version {}", target);
    }
    tx.commit()?;
    Ok(())
}

/// Read the stored schema version; 0 for a fresh database.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or is not a number.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
