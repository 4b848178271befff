//! Data models for SkillHub
//!
//! Defines the persisted structures: Profile, UserRecord and Document, plus
//! the Identity key and the TagSet used for document tags and tag filters.
//! Field names serialize in camelCase so the stored mapping keeps the
//! `uploadDate` / `rollNumber` layout.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder for profile fields the user has not filled in yet
pub const UNSET: &str = "Not set";

/// A normalized email address (trimmed, lower-cased)
///
/// Two emails differing only by case or surrounding whitespace are the same
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Normalize a raw email into an identity
    pub fn new(email: &str) -> Self {
        Self(email.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before `@` (the whole string when there is none)
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Personal details shown on the profile page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub major: String,
    pub year_of_study: String,
    pub contact: String,
    /// Letter avatar
    pub avatar_url: String,
}

impl Profile {
    /// Placeholder profile for a freshly registered identity
    pub fn placeholder(identity: &Identity) -> Self {
        let roll_number = identity.local_part().to_string();
        Self {
            name: format!("Student {}", roll_number),
            roll_number,
            email: identity.as_str().to_string(),
            major: UNSET.to_string(),
            year_of_study: UNSET.to_string(),
            contact: UNSET.to_string(),
            avatar_url: "S".to_string(),
        }
    }

    /// Set a field by its user-facing name
    ///
    /// Accepts both camelCase and snake_case names. The email is the identity
    /// key and cannot be changed here. Returns false for unknown fields.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "rollNumber" | "roll_number" => &mut self.roll_number,
            "major" => &mut self.major,
            "yearOfStudy" | "year_of_study" => &mut self.year_of_study,
            "contact" => &mut self.contact,
            "avatarUrl" | "avatar_url" => &mut self.avatar_url,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// The kind of file a document points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
    Png,
    Jpg,
    Txt,
    Other,
}

impl DocumentType {
    /// Infer the type from a file name's extension
    pub fn from_file_name(name: &str) -> Self {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return DocumentType::Other,
        };
        match extension.as_str() {
            "pdf" => DocumentType::Pdf,
            "doc" | "docx" => DocumentType::Docx,
            "png" => DocumentType::Png,
            "jpg" | "jpeg" => DocumentType::Jpg,
            "txt" => DocumentType::Txt,
            _ => DocumentType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
            DocumentType::Png => "png",
            DocumentType::Jpg => "jpg",
            DocumentType::Txt => "txt",
            DocumentType::Other => "other",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of tags
///
/// Serializes as a plain array. Iteration order is lexical so output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Add a tag. Returns false if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// Remove a tag. Returns false if it was not present.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(tag)
    }

    /// Flip membership: present tags are removed, absent tags are added.
    /// Returns whether the tag is present afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.0.remove(tag) {
            false
        } else {
            self.0.insert(tag.to_string());
            true
        }
    }

    /// True when at least one tag is shared with `other`
    pub fn intersects(&self, other: &TagSet) -> bool {
        self.0.iter().any(|t| other.contains(t))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for TagSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// A stored document
///
/// Immutable once created: the repository assigns `id` and `upload_date` and
/// never edits either afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique within the owning record
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub tags: TagSet,
    /// Reference to the uploaded content
    pub url: String,
}

/// Input for creating a document
///
/// The url comes from the upload capability; id and upload date are assigned
/// by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDraft {
    pub name: String,
    pub doc_type: DocumentType,
    pub tags: TagSet,
    pub url: String,
}

impl DocumentDraft {
    /// Create a draft, inferring the type from the name
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            doc_type: DocumentType::from_file_name(&name),
            name,
            tags: TagSet::new(),
            url: url.into(),
        }
    }

    /// Add tags, trimming whitespace and dropping blanks
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Turn the draft into a document with a fresh id and the given timestamp
    pub(crate) fn into_document(self, upload_date: DateTime<Utc>) -> Document {
        Document {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            doc_type: self.doc_type,
            upload_date,
            tags: self.tags,
            url: self.url,
        }
    }
}

/// Everything persisted for one identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub profile: Profile,
    /// Stored and compared in clear form
    #[serde(rename = "password")]
    pub credential_secret: String,
    /// Most recently added first
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl UserRecord {
    /// Identity this record is stored under
    pub fn identity(&self) -> Identity {
        Identity::new(&self.profile.email)
    }
}
