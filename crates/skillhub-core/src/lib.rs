//! SkillHub Core Library
//!
//! This crate provides the core functionality for SkillHub, a per-user
//! document locker: an email-keyed identity store, a session pointer, and a
//! tagged document collection with search, tag filtering and sorting.
//!
//! # Architecture
//!
//! - **Storage**: a flat key/value store holding the whole user mapping under
//!   one key. Every mutation is read-modify-write of the full mapping.
//!
//! Queries run over snapshots returned by the repository and never touch the
//! store.
//!
//! # Quick Start
//!
//! ```text
//! let storage = open_configured(&config)?;
//! let store = CredentialStore::new(storage.clone());
//! let record = store.authenticate_or_register("a@x.ac.in", "pw1", &seed)?;
//!
//! let repo = DocumentRepository::new(&store);
//! repo.add(&record.identity(), DocumentDraft::new("notes.pdf", url))?;
//!
//! let view = Section::Curriculum.view();
//! let docs = view.apply(&repo.list(&record.identity())?);
//! ```
//!
//! # Modules
//!
//! - `credentials`: Identity store (login-or-register, record updates)
//! - `session`: Current identity and its persisted token
//! - `repository`: Document collection operations
//! - `query`: Search, tag filter, sort and section presets
//! - `upload`: Upload capability and size checks
//! - `models`: Profiles, documents and tags
//! - `storage`: Key/value backends (JSON files, SQLite, memory)
//! - `seed`: Starter documents for new identities
//! - `config`: Application configuration

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod seed;
pub mod session;
pub mod storage;
pub mod upload;

pub use config::{Backend, Config};
pub use credentials::{validate_login, CredentialStore};
pub use error::{Error, Result};
pub use models::{Document, DocumentDraft, DocumentType, Identity, Profile, TagSet, UserRecord};
pub use query::{all_tags, filter, QueryCriteria, Section, SortDirection, SortKey, ViewState};
pub use repository::DocumentRepository;
pub use seed::load_seed;
pub use session::SessionManager;
pub use storage::{open_configured, Storage, StorageError};
pub use upload::{upload_document, validate_upload, LocalUploader, UploadError, Uploader};
