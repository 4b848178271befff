//! Identity storage and the authenticate-or-register gate
//!
//! All records live in one mapping, keyed by normalized email, stored under
//! [`USERS_KEY`]. Every operation reads the mapping fresh and writes the whole
//! mapping back, so there is no cached state to go stale inside one handle.
//! Two handles (or processes) writing at once still race: whichever write
//! lands last wins.
//!
//! Secrets are stored and compared in clear form. This is a convenience gate,
//! not a security boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Document, Identity, Profile, UserRecord};
use crate::storage::{Storage, StorageError, USERS_KEY};

type UserMap = BTreeMap<Identity, UserRecord>;

/// Durable per-identity records
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    /// Create a store over the given backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Authenticate an existing identity or register a new one
    ///
    /// Existing identity: the secret must match byte for byte, otherwise
    /// `InvalidCredential` is returned and nothing is written. New identity:
    /// a record with a placeholder profile and `seed_documents` is created and
    /// persisted.
    pub fn authenticate_or_register(
        &self,
        email: &str,
        secret: &str,
        seed_documents: &[Document],
    ) -> Result<UserRecord> {
        let identity = Identity::new(email);
        let mut users = self.load_users()?;

        if let Some(record) = users.get(&identity) {
            if record.credential_secret.as_bytes() == secret.as_bytes() {
                debug!(%identity, "authenticated");
                return Ok(record.clone());
            }
            debug!(%identity, "secret mismatch");
            return Err(Error::InvalidCredential);
        }

        let record = UserRecord {
            profile: Profile::placeholder(&identity),
            credential_secret: secret.to_string(),
            documents: seed_documents.to_vec(),
        };
        users.insert(identity.clone(), record.clone());
        self.save_users(&users)?;

        info!(%identity, seeded = seed_documents.len(), "registered new identity");
        Ok(record)
    }

    /// Look up a record by email
    pub fn get_record(&self, email: &str) -> Result<Option<UserRecord>> {
        let identity = Identity::new(email);
        Ok(self.load_users()?.remove(&identity))
    }

    /// True if no record exists yet for this email
    pub fn is_new_identity(&self, email: &str) -> Result<bool> {
        Ok(self.get_record(email)?.is_none())
    }

    /// Replace the profile wholesale
    ///
    /// The profile's email must name the same identity; the key cannot be
    /// changed through a profile edit.
    pub fn update_profile(&self, email: &str, profile: Profile) -> Result<()> {
        let identity = Identity::new(email);
        if Identity::new(&profile.email) != identity {
            return Err(Error::validation(format!(
                "profile email '{}' does not match account '{}'",
                profile.email, identity
            )));
        }

        self.modify(&identity, |record| record.profile = profile)?;
        info!(%identity, "updated profile");
        Ok(())
    }

    /// Replace the whole document collection
    pub fn update_documents(&self, email: &str, documents: Vec<Document>) -> Result<()> {
        let identity = Identity::new(email);
        let count = documents.len();
        self.modify(&identity, |record| record.documents = documents)?;
        debug!(%identity, count, "replaced documents");
        Ok(())
    }

    /// Number of stored records
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.load_users()?.len())
    }

    fn modify(&self, identity: &Identity, f: impl FnOnce(&mut UserRecord)) -> Result<()> {
        let mut users = self.load_users()?;
        let record = users
            .get_mut(identity)
            .ok_or_else(|| Error::NotFound(identity.clone()))?;
        f(record);
        self.save_users(&users)
    }

    fn load_users(&self) -> Result<UserMap> {
        let Some(raw) = self.storage.read(USERS_KEY)? else {
            return Ok(UserMap::new());
        };
        let users = serde_json::from_str(&raw).map_err(|e| StorageError::corrupt(USERS_KEY, e))?;
        Ok(users)
    }

    fn save_users(&self, users: &UserMap) -> Result<()> {
        let raw =
            serde_json::to_string(users).map_err(|e| StorageError::corrupt(USERS_KEY, e))?;
        self.storage.write(USERS_KEY, &raw)?;
        Ok(())
    }
}

/// Check login input before it reaches the store
///
/// Both fields must be non-blank. When `domain` is set the email must belong
/// to it (e.g. `iiserb.ac.in`).
pub fn validate_login(email: &str, secret: &str, domain: Option<&str>) -> Result<()> {
    if email.trim().is_empty() || secret.trim().is_empty() {
        return Err(Error::validation("Please enter both Email and Password."));
    }

    if let Some(domain) = domain {
        let domain = domain.trim().trim_start_matches('@').to_lowercase();
        let identity = Identity::new(email);
        if !identity.as_str().ends_with(&format!("@{}", domain)) {
            return Err(Error::validation(format!(
                "Invalid email. Please use your official @{} address.",
                domain
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentDraft, UNSET};
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    fn test_store() -> (CredentialStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (CredentialStore::new(storage.clone()), storage)
    }

    fn seed() -> Vec<Document> {
        vec![
            DocumentDraft::new("Transcript.pdf", "https://example.com/t.pdf")
                .with_tags(["Curriculum"])
                .into_document(Utc::now()),
            DocumentDraft::new("React.png", "https://example.com/r.png")
                .with_tags(["Skill", "React"])
                .into_document(Utc::now()),
        ]
    }

    #[test]
    fn test_register_creates_placeholder_record() {
        let (store, _) = test_store();

        let record = store
            .authenticate_or_register("a@x.ac.in", "pw1", &seed())
            .unwrap();

        assert_eq!(record.profile.email, "a@x.ac.in");
        assert_eq!(record.profile.name, "Student a");
        assert_eq!(record.profile.major, UNSET);
        assert_eq!(record.credential_secret, "pw1");
        assert_eq!(record.documents.len(), 2);
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn test_normalized_emails_share_a_record() {
        let (store, _) = test_store();

        store
            .authenticate_or_register("A@X.AC.IN ", "pw1", &[])
            .unwrap();
        let record = store.get_record("a@x.ac.in").unwrap().unwrap();

        assert_eq!(record.profile.email, "a@x.ac.in");
        assert!(store
            .authenticate_or_register("  a@x.ac.in", "pw1", &[])
            .is_ok());
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn test_login_is_idempotent() {
        let (store, _) = test_store();

        let first = store
            .authenticate_or_register("a@x.ac.in", "pw1", &seed())
            .unwrap();
        let second = store
            .authenticate_or_register("a@x.ac.in", "pw1", &seed())
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn test_wrong_secret_leaves_record_unchanged() {
        let (store, storage) = test_store();

        store
            .authenticate_or_register("a@x.ac.in", "pw1", &seed())
            .unwrap();
        let before = storage.read(USERS_KEY).unwrap();

        let err = store
            .authenticate_or_register("a@x.ac.in", "pw2", &[])
            .unwrap_err();

        assert!(matches!(err, Error::InvalidCredential));
        assert_eq!(storage.read(USERS_KEY).unwrap(), before);
    }

    #[test]
    fn test_secret_comparison_is_exact() {
        let (store, _) = test_store();

        store.authenticate_or_register("a@x.ac.in", "pw1", &[]).unwrap();

        assert!(store.authenticate_or_register("a@x.ac.in", "PW1", &[]).is_err());
        assert!(store.authenticate_or_register("a@x.ac.in", "pw1 ", &[]).is_err());
    }

    #[test]
    fn test_get_record_missing() {
        let (store, _) = test_store();
        assert!(store.get_record("nobody@x.ac.in").unwrap().is_none());
        assert!(store.is_new_identity("nobody@x.ac.in").unwrap());
    }

    #[test]
    fn test_update_profile() {
        let (store, _) = test_store();
        let record = store.authenticate_or_register("a@x.ac.in", "pw1", &[]).unwrap();

        let mut profile = record.profile;
        profile.major = "CS".to_string();
        store.update_profile("A@x.ac.in", profile).unwrap();

        let stored = store.get_record("a@x.ac.in").unwrap().unwrap();
        assert_eq!(stored.profile.major, "CS");
        assert_eq!(stored.credential_secret, "pw1");
    }

    #[test]
    fn test_update_profile_rejects_other_email() {
        let (store, _) = test_store();
        let record = store.authenticate_or_register("a@x.ac.in", "pw1", &[]).unwrap();

        let mut profile = record.profile;
        profile.email = "b@x.ac.in".to_string();
        let err = store.update_profile("a@x.ac.in", profile).unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_update_missing_identity_is_not_found() {
        let (store, _) = test_store();

        let profile = Profile::placeholder(&Identity::new("ghost@x.ac.in"));
        assert!(matches!(
            store.update_profile("ghost@x.ac.in", profile),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            store.update_documents("ghost@x.ac.in", Vec::new()),
            Err(Error::NotFound(_))
        ));
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn test_update_documents_replaces_snapshot() {
        let (store, _) = test_store();
        store
            .authenticate_or_register("a@x.ac.in", "pw1", &seed())
            .unwrap();

        store.update_documents("a@x.ac.in", Vec::new()).unwrap();

        let stored = store.get_record("a@x.ac.in").unwrap().unwrap();
        assert!(stored.documents.is_empty());
    }

    #[test]
    fn test_corrupt_mapping_is_surfaced() {
        let (store, storage) = test_store();
        storage.write(USERS_KEY, "{not json").unwrap();

        let err = store.get_record("a@x.ac.in").unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));

        let err = store
            .authenticate_or_register("a@x.ac.in", "pw1", &[])
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        // The corrupt payload is left in place rather than overwritten
        assert_eq!(storage.read(USERS_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_stale_snapshot_write_wins() {
        let (store, _) = test_store();
        let other = store.clone();
        store.authenticate_or_register("a@x.ac.in", "pw1", &[]).unwrap();

        // Both handles start from the same snapshot
        let stale = other.get_record("a@x.ac.in").unwrap().unwrap().documents;

        let fresh = seed();
        store.update_documents("a@x.ac.in", fresh).unwrap();
        other.update_documents("a@x.ac.in", stale).unwrap();

        let stored = store.get_record("a@x.ac.in").unwrap().unwrap();
        assert!(stored.documents.is_empty());
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("a@x.ac.in", "pw", None).is_ok());
        assert!(matches!(
            validate_login("  ", "pw", None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_login("a@x.ac.in", "   ", None),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_login_domain() {
        assert!(validate_login("21CS042@IISERB.ac.in ", "pw", Some("iiserb.ac.in")).is_ok());
        assert!(validate_login("a@iiserb.ac.in", "pw", Some("@iiserb.ac.in")).is_ok());
        assert!(validate_login("a@gmail.com", "pw", Some("iiserb.ac.in")).is_err());
        assert!(validate_login("a@notiiserb.ac.in", "pw", Some("iiserb.ac.in")).is_err());
    }
}
