//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;

use skillhub_core::{Document, Profile, TagSet};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print one document in full
    pub fn print_document(&self, doc: &Document) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", doc.id);
                println!("Name:     {}", doc.name);
                println!("Type:     {}", doc.doc_type);
                println!("Uploaded: {}", doc.upload_date.format("%Y-%m-%d %H:%M"));
                if !doc.tags.is_empty() {
                    println!("Tags:     {}", join_tags(&doc.tags));
                }
                println!("URL:      {}", doc.url);
            }
            OutputFormat::Json => print_json(doc)?,
            OutputFormat::Quiet => println!("{}", doc.id),
        }
        Ok(())
    }

    /// Print a list of documents
    pub fn print_documents(&self, title: &str, docs: &[Document]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", title);
                println!();
                if docs.is_empty() {
                    println!("No documents found.");
                    return Ok(());
                }
                for doc in docs {
                    println!(
                        "{} | {:<4} | {} | {}{}",
                        short_id(&doc.id),
                        doc.doc_type.as_str(),
                        doc.upload_date.format("%Y-%m-%d"),
                        truncate(&doc.name, 40),
                        if doc.tags.is_empty() {
                            String::new()
                        } else {
                            format!(" [{}]", join_tags(&doc.tags))
                        }
                    );
                }
                println!("\n{} document(s)", docs.len());
            }
            OutputFormat::Json => print_json(&docs)?,
            OutputFormat::Quiet => {
                for doc in docs {
                    println!("{}", doc.id);
                }
            }
        }
        Ok(())
    }

    /// Print a profile
    pub fn print_profile(&self, profile: &Profile) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("Name:          {}", profile.name);
                println!("Roll number:   {}", profile.roll_number);
                println!("Email:         {}", profile.email);
                println!("Major:         {}", profile.major);
                println!("Year of study: {}", profile.year_of_study);
                println!("Contact:       {}", profile.contact);
            }
            OutputFormat::Json => print_json(profile)?,
            OutputFormat::Quiet => println!("{}", profile.email),
        }
        Ok(())
    }

    /// Print a set of tags
    pub fn print_tags(&self, tags: &TagSet) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return Ok(());
                }
                for tag in tags.iter() {
                    println!("{}", tag);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => print_json(tags)?,
            OutputFormat::Quiet => {
                for tag in tags.iter() {
                    println!("{}", tag);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join_tags(tags: &TagSet) -> String {
    tags.iter().collect::<Vec<_>>().join(", ")
}

/// First 8 characters of an id
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
