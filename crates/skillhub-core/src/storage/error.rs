//! Storage error handling
//!
//! Backends report failures as [`StorageError`]. File I/O failures are
//! classified by cause so the CLI can suggest a fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// `ENOSPC` / `ERROR_DISK_FULL`
const DISK_FULL_CODES: [i32; 2] = [28, 112];

/// What the backend was doing when an I/O call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Read,
    Write,
    Remove,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOperation::Read => "read",
            IoOperation::Write => "write",
            IoOperation::Remove => "remove",
        })
    }
}

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot {op} '{path}'")]
    PermissionDenied {
        op: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to {op} '{path}'")]
    DiskFull {
        op: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not {op} '{path}': {source}")]
    Io {
        op: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The value under `key` is not a valid payload
    #[error("Stored data under '{key}' is corrupted: {details}")]
    Corrupt { key: String, details: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The temp file was written but could not replace the target
    #[error("Could not replace '{to}' with '{from}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O failure on `path`
    pub fn from_io(op: IoOperation, error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                op,
                path,
                source: error,
            }
        } else if is_disk_full(&error) {
            StorageError::DiskFull {
                op,
                path,
                source: error,
            }
        } else {
            StorageError::Io {
                op,
                path,
                source: error,
            }
        }
    }

    pub fn corrupt(key: &str, details: impl ToString) -> Self {
        StorageError::Corrupt {
            key: key.to_string(),
            details: details.to_string(),
        }
    }

    /// True when the user can fix the cause and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::DiskFull { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::CreateDirectory { .. }
        )
    }

    /// A hint to show next to the error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } | StorageError::CreateDirectory { .. } => {
                Some("Check permissions on the data directory, or point data_dir elsewhere.")
            }
            StorageError::Corrupt { .. } => Some(
                "Restore the data directory from a backup, or move the file aside to start fresh.",
            ),
            _ => None,
        }
    }
}

fn is_disk_full(error: &io::Error) -> bool {
    if let Some(code) = error.raw_os_error() {
        return DISK_FULL_CODES.contains(&code);
    }
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

pub type StorageResult<T> = Result<T, StorageError>;
