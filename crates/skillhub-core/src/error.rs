//! Error types for SkillHub core operations
//!
//! Errors are descriptive at the core level; the CLI maps them to messages
//! for the user.

use thiserror::Error;

use crate::models::Identity;
use crate::storage::StorageError;
use crate::upload::UploadError;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Secret did not match the one stored for an existing identity
    #[error("Invalid credentials. Please check your email and password.")]
    InvalidCredential,

    /// No record exists for the identity
    #[error("No account found for '{0}'")]
    NotFound(Identity),

    /// The upload capability failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Caller-side input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backing store could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
