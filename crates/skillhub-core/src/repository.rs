//! Document collection operations scoped to one identity
//!
//! Every mutation reads the identity's current collection, applies the
//! change and writes the whole collection back through the credential store.

use chrono::Utc;
use tracing::info;

use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::models::{Document, DocumentDraft, Identity};

/// CRUD over a user's documents
pub struct DocumentRepository<'a> {
    store: &'a CredentialStore,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        Self { store }
    }

    /// Snapshot of the identity's documents, most recently added first
    pub fn list(&self, identity: &Identity) -> Result<Vec<Document>> {
        self.record_documents(identity)
    }

    /// Find one document by id
    pub fn get(&self, identity: &Identity, document_id: &str) -> Result<Option<Document>> {
        Ok(self
            .record_documents(identity)?
            .into_iter()
            .find(|d| d.id == document_id))
    }

    /// Create a document from `draft` and put it first in the collection
    ///
    /// Size and type checks belong to the caller and are not repeated here.
    pub fn add(&self, identity: &Identity, draft: DocumentDraft) -> Result<Document> {
        let mut documents = self.record_documents(identity)?;

        let mut document = draft.into_document(Utc::now());
        while documents.iter().any(|d| d.id == document.id) {
            document.id = uuid::Uuid::new_v4().to_string();
        }

        documents.insert(0, document.clone());
        self.store.update_documents(identity.as_str(), documents)?;

        info!(%identity, id = %document.id, name = %document.name, "added document");
        Ok(document)
    }

    /// Remove a document by id
    ///
    /// Removing an id that is not present succeeds and leaves the collection
    /// as it was.
    pub fn remove(&self, identity: &Identity, document_id: &str) -> Result<()> {
        let documents = self.record_documents(identity)?;
        let before = documents.len();

        let remaining: Vec<Document> = documents
            .into_iter()
            .filter(|d| d.id != document_id)
            .collect();
        let removed = before - remaining.len();

        self.store.update_documents(identity.as_str(), remaining)?;

        info!(%identity, id = document_id, removed, "removed document");
        Ok(())
    }

    fn record_documents(&self, identity: &Identity) -> Result<Vec<Document>> {
        self.store
            .get_record(identity.as_str())?
            .map(|record| record.documents)
            .ok_or_else(|| Error::NotFound(identity.clone()))
    }
}
