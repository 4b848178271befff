//! Filtering and sorting of document collections
//!
//! [`filter`] is a pure function: it takes a snapshot and criteria and
//! returns a new, ordered snapshot. [`ViewState`] holds the interactive state
//! of a document view (search box, active tags, sort buttons) and produces
//! the criteria.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Document, TagSet};

/// Field to sort on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    UploadDate,
    Name,
}

impl SortKey {
    /// Direction a key starts in when first selected
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKey::UploadDate => SortDirection::Desc,
            SortKey::Name => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// What to keep and how to order it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCriteria {
    /// Case-insensitive substring of the name; empty means no search
    pub search_query: String,
    /// Keep documents with at least one of these tags; empty means no tag filter
    pub active_tags: TagSet,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            active_tags: TagSet::new(),
            sort_key: SortKey::UploadDate,
            sort_direction: SortKey::UploadDate.default_direction(),
        }
    }
}

/// Apply search, tag filter and sort to a snapshot
///
/// The tag filter is an OR: one matching tag is enough. The sort is stable,
/// and direction is applied by reversing the comparator, so documents with
/// equal keys keep their input order in both directions.
pub fn filter(documents: &[Document], criteria: &QueryCriteria) -> Vec<Document> {
    let needle = criteria.search_query.to_lowercase();

    let mut result: Vec<Document> = documents
        .iter()
        .filter(|doc| needle.is_empty() || doc.name.to_lowercase().contains(&needle))
        .filter(|doc| criteria.active_tags.is_empty() || doc.tags.intersects(&criteria.active_tags))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let ord = compare(a, b, criteria.sort_key);
        match criteria.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    result
}

fn compare(a: &Document, b: &Document, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collate(&a.name, &b.name),
        SortKey::UploadDate => a.upload_date.cmp(&b.upload_date),
    }
}

/// Case-insensitive lexical comparison
fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Every distinct tag used across a collection
pub fn all_tags(documents: &[Document]) -> TagSet {
    documents
        .iter()
        .flat_map(|doc| doc.tags.iter())
        .collect()
}

/// Interactive state of one document view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    criteria: QueryCriteria,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Newest first, no search, no tag filter
    pub fn new() -> Self {
        Self {
            criteria: QueryCriteria::default(),
        }
    }

    /// A view that starts with `tag` active
    pub fn with_default_tag(tag: &str) -> Self {
        let mut state = Self::new();
        state.criteria.active_tags.insert(tag);
        state
    }

    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.criteria.search_query = query.into();
    }

    /// Select a sort key
    ///
    /// Re-selecting the current key flips the direction; selecting another
    /// key switches to it in that key's default direction.
    pub fn select_sort(&mut self, key: SortKey) {
        if key == self.criteria.sort_key {
            self.criteria.sort_direction = self.criteria.sort_direction.flipped();
        } else {
            self.criteria.sort_key = key;
            self.criteria.sort_direction = key.default_direction();
        }
    }

    /// Flip a tag's membership in the active set
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.criteria.active_tags.toggle(tag)
    }

    /// Run the current criteria over a snapshot
    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        filter(documents, &self.criteria)
    }
}

/// Preset document views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Skills,
    Certificates,
    Curriculum,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Skills,
        Section::Certificates,
        Section::Curriculum,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Dashboard => "All Documents",
            Section::Skills => "Skills Earned",
            Section::Certificates => "Certificates",
            Section::Curriculum => "Curriculum",
        }
    }

    /// Tags that admit a document into this section; `None` admits everything
    ///
    /// A document needs only one of them.
    pub fn member_tags(self) -> Option<&'static [&'static str]> {
        match self {
            Section::Dashboard => None,
            Section::Skills => Some(&["Skill"]),
            Section::Certificates => Some(&["Certificate"]),
            Section::Curriculum => Some(&["Curriculum", "Notes", "Assignment"]),
        }
    }

    /// Tag active when the section is opened
    pub fn default_tag(self) -> Option<&'static str> {
        match self {
            Section::Skills => Some("Skill"),
            Section::Certificates => Some("Certificate"),
            Section::Dashboard | Section::Curriculum => None,
        }
    }

    /// Tags offered as filter buttons
    pub fn available_tags(self, documents: &[Document]) -> TagSet {
        match self {
            Section::Dashboard => all_tags(documents),
            Section::Skills => ["Skill", "React"].into_iter().collect(),
            Section::Certificates => ["Certificate"].into_iter().collect(),
            Section::Curriculum => ["Curriculum", "Notes", "Assignment", "Physics"]
                .into_iter()
                .collect(),
        }
    }

    /// Documents the section works over, before any view filtering
    pub fn documents(self, documents: &[Document]) -> Vec<Document> {
        match self.member_tags() {
            Some(tags) => documents
                .iter()
                .filter(|doc| tags.iter().any(|tag| doc.tags.contains(tag)))
                .cloned()
                .collect(),
            None => documents.to_vec(),
        }
    }

    /// Fresh view state for this section
    pub fn view(self) -> ViewState {
        match self.default_tag() {
            Some(tag) => ViewState::with_default_tag(tag),
            None => ViewState::new(),
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dashboard" | "all" => Ok(Section::Dashboard),
            "skills" => Ok(Section::Skills),
            "certificates" => Ok(Section::Certificates),
            "curriculum" => Ok(Section::Curriculum),
            other => Err(format!(
                "unknown section '{}' (dashboard, skills, certificates, curriculum)",
                other
            )),
        }
    }
}
