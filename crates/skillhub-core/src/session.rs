//! Current-identity tracking
//!
//! The session is a single pointer to the active identity. It is mirrored to
//! session-scoped storage under [`SESSION_KEY`] so a later run can restore it.
//! Nothing is coordinated across processes.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::models::{Identity, UserRecord};
use crate::storage::{Storage, StorageError, SESSION_KEY};

/// Tracks which identity is current for this process
pub struct SessionManager {
    storage: Arc<dyn Storage>,
    store: CredentialStore,
    current: Option<Identity>,
}

impl SessionManager {
    /// Create a manager with no current identity
    ///
    /// `storage` holds the session token; `store` resolves it to a record.
    pub fn new(storage: Arc<dyn Storage>, store: CredentialStore) -> Self {
        Self {
            storage,
            store,
            current: None,
        }
    }

    /// Make `record` the current identity and persist the token
    pub fn login(&mut self, record: &UserRecord) -> Result<()> {
        let identity = record.identity();
        self.persist(&identity)?;
        info!(%identity, "logged in");
        self.current = Some(identity);
        Ok(())
    }

    /// Forget the current identity and its persisted token
    pub fn logout(&mut self) -> Result<()> {
        self.clear()?;
        if let Some(identity) = self.current.take() {
            info!(%identity, "logged out");
        }
        Ok(())
    }

    /// Restore the identity from a previous run, if any
    ///
    /// A token that no longer resolves to a record (the store was cleared or
    /// holds a corrupt mapping) is discarded and reported as no session. Any
    /// other storage failure is returned and the token is kept.
    pub fn restore_session(&mut self) -> Result<Option<UserRecord>> {
        let Some(identity) = self.load()? else {
            return Ok(None);
        };

        match self.store.get_record(identity.as_str()) {
            Ok(Some(record)) => {
                debug!(%identity, "restored session");
                self.current = Some(identity);
                Ok(Some(record))
            }
            Ok(None) => {
                warn!(%identity, "session token has no matching record, discarding");
                self.discard()?;
                Ok(None)
            }
            Err(Error::Storage(e @ StorageError::Corrupt { .. })) => {
                warn!(%identity, error = %e, "user store is corrupt, discarding session token");
                self.discard()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The current identity, if logged in
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Fetch the current identity's record from the store
    pub fn current_record(&self) -> Result<Option<UserRecord>> {
        match &self.current {
            Some(identity) => self.store.get_record(identity.as_str()),
            None => Ok(None),
        }
    }

    /// Read the persisted token
    pub fn load(&self) -> Result<Option<Identity>> {
        let token = self.storage.read(SESSION_KEY)?;
        Ok(token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Identity::new))
    }

    /// Write the token for `identity`
    pub fn persist(&self, identity: &Identity) -> Result<()> {
        self.storage.write(SESSION_KEY, identity.as_str())?;
        Ok(())
    }

    /// Remove the persisted token
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY)?;
        Ok(())
    }

    fn discard(&mut self) -> Result<()> {
        self.current = None;
        self.clear()
    }
}
