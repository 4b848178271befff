//! Storage layer
//!
//! Every persisted value lives under a string key as a serialized payload.
//! The credential store keeps the whole user mapping under one key and the
//! session keeps the current identity under another.
//!
//! ## Backends
//!
//! - **JSON files**: one file per key in the data directory, atomic writes
//! - **SQLite**: a single key/value table
//! - **Memory**: process-local map, used by tests and throwaway sessions
//!
//! There is no locking across handles. Two writers on the same key race and
//! the last write wins.

pub mod error;
pub mod memory;
pub mod persistence;
pub mod sqlite;

use std::sync::Arc;

use crate::config::{Backend, Config};

pub use error::{IoOperation, StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use persistence::JsonFileStorage;
pub use sqlite::SqliteStorage;

/// Key holding the identity -> record mapping
pub const USERS_KEY: &str = "skillhub_users";

/// Key holding the current session's identity
pub const SESSION_KEY: &str = "skillhub_session";

/// Key/value persistence used by the credential store and the session
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Open the backend selected in the configuration
pub fn open_configured(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.backend {
        Backend::Json => Arc::new(JsonFileStorage::open(&config.data_dir)?),
        Backend::Sqlite => Arc::new(SqliteStorage::open(&config.sqlite_path())?),
    };
    Ok(storage)
}
