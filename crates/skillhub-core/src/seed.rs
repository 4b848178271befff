//! Starter documents for newly registered identities

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Document;

/// Load the seed collection from a JSON array of documents
///
/// No path means new identities start with an empty collection.
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Document>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;

    debug!(path = %path.display(), count = documents.len(), "loaded seed documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;
    use tempfile::TempDir;

    #[test]
    fn test_no_path_is_empty() {
        assert!(load_seed(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_seed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[
                {
                    "id": "1",
                    "name": "React Certificate.png",
                    "type": "png",
                    "uploadDate": "2024-05-01T10:00:00Z",
                    "tags": ["Skill", "React", "Certificate"],
                    "url": "https://example.com/react.png"
                },
                {
                    "id": "2",
                    "name": "Semester Notes.pdf",
                    "type": "pdf",
                    "uploadDate": "2024-04-11T08:30:00Z",
                    "tags": ["Curriculum", "Notes"],
                    "url": "https://example.com/notes.pdf"
                }
            ]"#,
        )
        .unwrap();

        let docs = load_seed(Some(&path)).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_type, DocumentType::Png);
        assert!(docs[1].tags.contains("Notes"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_seed(Some(&temp.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read seed file"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seed.json");
        std::fs::write(&path, "{ not an array").unwrap();

        assert!(load_seed(Some(&path)).is_err());
    }
}
