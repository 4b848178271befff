//! Document command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use skillhub_core::{
    filter, upload_document, Document, LocalUploader, QueryCriteria, Section, SortDirection,
    SortKey, TagSet,
};

use crate::app::App;
use crate::output::Output;
use crate::prompt::{confirm, is_interactive};

/// Options for `doc list`
pub struct ListArgs {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub sort_key: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
    pub section: Section,
}

impl ListArgs {
    /// Criteria for these options on top of the section's preset
    ///
    /// Explicit tags replace the section's default tag. Without an explicit
    /// direction a key sorts in its default direction.
    fn criteria(&self) -> QueryCriteria {
        let mut criteria = self.section.view().criteria().clone();

        if let Some(search) = &self.search {
            criteria.search_query = search.clone();
        }
        if !self.tags.is_empty() {
            criteria.active_tags = self.tags.iter().map(|t| t.trim()).collect::<TagSet>();
        }
        if let Some(key) = self.sort_key {
            criteria.sort_key = key;
            criteria.sort_direction = key.default_direction();
        }
        if let Some(direction) = self.sort_direction {
            criteria.sort_direction = direction;
        }
        criteria
    }
}

/// List documents
pub fn list(app: &mut App, args: ListArgs, output: &Output) -> Result<()> {
    let (_, documents) = app.documents()?;

    let pool = args.section.documents(&documents);
    let shown = filter(&pool, &args.criteria());

    output.print_documents(args.section.title(), &shown)
}

/// Upload a file and add it as a document
pub async fn add(
    app: &mut App,
    path: PathBuf,
    tags: Vec<String>,
    name: Option<String>,
    output: &Output,
) -> Result<()> {
    let record = app.require_login()?;

    let name = match name {
        Some(n) => n,
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Cannot determine a file name for {:?}", path))?,
    };

    let metadata = tokio::fs::metadata(&path)
        .await
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    if !metadata.is_file() {
        bail!("Not a file: {:?}", path);
    }
    skillhub_core::validate_upload(metadata.len(), app.config.max_upload_bytes)?;

    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let uploader = LocalUploader::new(app.config.uploads_dir());
    let repo = app.repository();
    let document = upload_document(
        &uploader,
        &repo,
        &record.identity(),
        &name,
        bytes,
        &tags,
        app.config.max_upload_bytes,
    )
    .await?;

    output.success(&format!("Uploaded: {}", document.name));
    if !output.is_quiet() && !output.is_json() {
        println!();
    }
    output.print_document(&document)
}

/// Show one document
pub fn show(app: &mut App, id: String, output: &Output) -> Result<()> {
    let (_, documents) = app.documents()?;
    let document = resolve_document(&documents, &id)?;
    output.print_document(document)
}

/// Delete a document
///
/// An id that matches nothing is reported and leaves the collection as it was.
pub fn delete(app: &mut App, id: String, yes: bool, output: &Output) -> Result<()> {
    let (identity, documents) = app.documents()?;

    let document = match resolve_document(&documents, &id) {
        Ok(doc) => doc.clone(),
        Err(e) if find_matches(&documents, &id).is_empty() => {
            output.message(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if needs_confirmation(output.should_prompt(), is_interactive(), yes) {
        println!("Delete document: {} - {}", document.id, document.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled. Pass --yes to delete without asking.");
            return Ok(());
        }
    }

    app.repository()
        .remove(&identity, &document.id)
        .context("Failed to delete document")?;

    output.success(&format!("Deleted document: {}", document.name));
    Ok(())
}

/// Open a document with the system handler
pub fn open(app: &mut App, id: String, output: &Output) -> Result<()> {
    let (_, documents) = app.documents()?;
    let document = resolve_document(&documents, &id)?;

    open::that(&document.url).with_context(|| format!("Failed to open {}", document.url))?;

    output.success(&format!("Opened {}", document.name));
    Ok(())
}

/// Ask before deleting only when someone at a terminal can answer
fn needs_confirmation(human_output: bool, interactive: bool, yes: bool) -> bool {
    human_output && interactive && !yes
}

fn find_matches<'a>(documents: &'a [Document], id: &str) -> Vec<&'a Document> {
    if let Some(exact) = documents.iter().find(|d| d.id == id) {
        return vec![exact];
    }
    documents.iter().filter(|d| d.id.starts_with(id)).collect()
}

/// Find a document by full id or unique prefix
fn resolve_document<'a>(documents: &'a [Document], id: &str) -> Result<&'a Document> {
    let matches = find_matches(documents, id);

    match matches.len() {
        0 => bail!("No document found matching: {}", id),
        1 => Ok(matches[0]),
        _ => {
            eprintln!("Multiple documents match '{}':", id);
            for doc in &matches {
                eprintln!("  {} - {}", doc.id, doc.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
