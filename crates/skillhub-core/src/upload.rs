//! File upload capability
//!
//! Uploading turns file bytes into a retrievable URL. The [`Uploader`] trait
//! is the seam: the CLI uses [`LocalUploader`], which copies files under the
//! data directory, while tests swap in stubs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Document, DocumentDraft, Identity};
use crate::repository::DocumentRepository;

/// Errors raised by an upload capability
#[derive(Debug, Error)]
pub enum UploadError {
    /// The capability reported a failure; the message is passed on verbatim
    #[error("Upload failed: {0}")]
    Failed(String),

    #[error("Upload failed: could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that stores file bytes and hands back a URL
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Store `bytes` under a name derived from `file_name`
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> std::result::Result<String, UploadError>;
}

/// Reject files larger than `max_bytes`
pub fn validate_upload(size: u64, max_bytes: u64) -> Result<()> {
    if size > max_bytes {
        return Err(Error::validation(format!(
            "File size cannot exceed {} MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Uploader that copies files into a local directory and returns `file://` URLs
#[derive(Debug, Clone)]
pub struct LocalUploader {
    dir: PathBuf,
}

impl LocalUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Uploader for LocalUploader {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> std::result::Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| UploadError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let target = self
            .dir
            .join(format!("{}-{}", uuid::Uuid::new_v4(), sanitize(file_name)));

        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|source| UploadError::Io {
                path: target.clone(),
                source,
            })?;

        debug!(path = %target.display(), size = bytes.len(), "stored upload");
        Ok(format!("file://{}", target.display()))
    }
}

/// Keep only the final path component and replace separators
fn sanitize(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Validate, upload and record a new document for `identity`
///
/// The document is created only after the uploader returns a URL; a failed
/// upload leaves the collection untouched.
pub async fn upload_document(
    uploader: &dyn Uploader,
    repo: &DocumentRepository<'_>,
    identity: &Identity,
    file_name: &str,
    bytes: Vec<u8>,
    tags: &[String],
    max_bytes: u64,
) -> Result<Document> {
    validate_upload(bytes.len() as u64, max_bytes)?;

    let url = uploader.upload(bytes, file_name).await.map_err(|e| {
        warn!(%identity, file = file_name, error = %e, "upload failed");
        e
    })?;

    let draft = DocumentDraft::new(file_name, url).with_tags(tags.iter().map(String::as_str));
    repo.add(identity, draft)
}
