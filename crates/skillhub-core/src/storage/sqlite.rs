//! SQLite key/value backend
//!
//! ## Tables
//!
//! - `kv` - one row per storage key
//! - `schema_version` - applied schema version

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::Storage;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
"#;

/// SQLite-backed storage
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> StorageResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StorageError::corrupt("kv", "connection lock poisoned"))?;
        Ok(f(&conn)?)
    }
}

/// Create tables and record the schema version if this is a fresh database
fn init_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(SCHEMA)?;
    let existing: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    if existing.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            params![SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

impl Storage for SqliteStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        })?;
        debug!(key, found = value.is_some(), "read entry");
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                "#,
                params![key, value],
            )
        })?;
        debug!(key, bytes = value.len(), "wrote entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.with_conn(|conn| conn.execute("DELETE FROM kv WHERE key = ?", params![key]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_round_trip() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        assert!(storage.read("skillhub_users").unwrap().is_none());
        storage.write("skillhub_users", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.read("skillhub_users").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn test_upsert_and_remove() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        storage.write("k", "one").unwrap();
        storage.write("k", "two").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("two"));

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.read("k").unwrap().is_none());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("skillhub.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.write("skillhub_session", "a@x.ac.in").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            storage.read("skillhub_session").unwrap().as_deref(),
            Some("a@x.ac.in")
        );
    }

    #[test]
    fn test_schema_version_recorded_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("skillhub.db");

        SqliteStorage::open(&path).unwrap();
        let storage = SqliteStorage::open(&path).unwrap();

        let count: i64 = storage
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
