//! Shared state for command handlers

use anyhow::{Context, Result};

use skillhub_core::{
    load_seed, open_configured, Config, CredentialStore, Document, DocumentRepository, Identity,
    SessionManager, UserRecord,
};

/// Configuration, store and session for one CLI invocation
pub struct App {
    pub config: Config,
    pub store: CredentialStore,
    pub session: SessionManager,
}

impl App {
    /// Open the configured backend
    ///
    /// The session token lives in the same backend as the user mapping,
    /// under its own key.
    pub fn open(config: Config) -> Result<Self> {
        let storage = open_configured(&config).context("Failed to open storage")?;
        let store = CredentialStore::new(storage.clone());
        let session = SessionManager::new(storage, store.clone());
        Ok(Self {
            config,
            store,
            session,
        })
    }

    /// Restore the session or fail with a hint to log in
    pub fn require_login(&mut self) -> Result<UserRecord> {
        self.session
            .restore_session()?
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `skillhub login <email>` first."))
    }

    pub fn repository(&self) -> DocumentRepository<'_> {
        DocumentRepository::new(&self.store)
    }

    /// Documents of the logged-in identity
    pub fn documents(&mut self) -> Result<(Identity, Vec<Document>)> {
        let record = self.require_login()?;
        Ok((record.identity(), record.documents))
    }

    /// Starter documents for new accounts
    pub fn seed(&self) -> Result<Vec<Document>> {
        load_seed(self.config.seed_file.as_deref())
    }
}
