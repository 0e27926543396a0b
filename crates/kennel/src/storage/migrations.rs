//! Schema versioning for the kennel database.
//!
//! The schema version lives in the `metadata` table under `schema_version`.
//! Each entry in [`MIGRATIONS`] upgrades the database by exactly one version
//! and runs inside its own transaction.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_METADATA_TABLE, CREATE_SLOTS_TABLE};

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

type Migration = fn(&Connection) -> Result<()>;

/// Ordered migrations; index `n` upgrades from version `n` to `n + 1`.
const MIGRATIONS: &[Migration] = &[create_slots];

/// The schema version a fully migrated database reports.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const CURRENT_VERSION: i32 = MIGRATIONS.len() as i32;

/// Bring the database schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open: a database already at the current version is
/// left untouched.
///
/// # Errors
///
/// Returns an error if the stored version is unreadable, newer than this
/// build understands, or a migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let mut version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    while version < CURRENT_VERSION {
        apply(conn, version)?;
        version += 1;
        info!("Migrated database schema to version {}", version);
    }

    debug!("Database schema at version {}", version);
    Ok(())
}

/// Read the schema version, treating a missing entry as version 0.
///
/// # Errors
///
/// Returns an error if the metadata table cannot be read or holds a
/// non-numeric version.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

/// Run the migration that upgrades `from` to `from + 1`.
fn apply(conn: &Connection, from: i32) -> Result<()> {
    let migration = usize::try_from(from)
        .ok()
        .and_then(|index| MIGRATIONS.get(index).copied())
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("no migration from version {from}"),
        })?;

    let tx = conn.unchecked_transaction()?;
    migration(&tx)?;
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, (from + 1).to_string()),
    )?;
    tx.commit()?;
    Ok(())
}

fn create_slots(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_SLOTS_TABLE, [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get::<_, i32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_initialize_creates_tables() {
        let conn = fresh_db();
        initialize_schema(&conn).unwrap();

        assert!(table_exists(&conn, "slots"));
        assert!(table_exists(&conn, "metadata"));
    }

    #[test]
    fn test_initialize_records_current_version() {
        let conn = fresh_db();
        initialize_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_initialize_twice_keeps_data() {
        let conn = fresh_db();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES ('dogs', x'5b5d', 'now')",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_missing_version_is_zero() {
        let conn = fresh_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_garbage_version_is_rejected() {
        let conn = fresh_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('schema_version', 'abc')",
            [],
        )
        .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let conn = fresh_db();
        conn.execute(CREATE_METADATA_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('schema_version', ?1)",
            [(CURRENT_VERSION + 1).to_string()],
        )
        .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_apply_unknown_version() {
        let conn = fresh_db();
        initialize_schema(&conn).unwrap();

        let err = apply(&conn, CURRENT_VERSION).unwrap_err();
        assert!(err.to_string().contains("no migration from version"));
    }

    #[test]
    fn test_slot_keys_are_unique() {
        let conn = fresh_db();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES ('dogs', x'00', 'now')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES ('dogs', x'01', 'now')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
