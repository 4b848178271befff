//! Tag command handlers

use anyhow::Result;

use skillhub_core::{all_tags, Section};

use crate::app::App;
use crate::output::Output;

/// List tags used across your documents, or the filter tags of a section
pub fn list(app: &mut App, section: Option<Section>, output: &Output) -> Result<()> {
    let (_, documents) = app.documents()?;

    let tags = match section {
        Some(section) => section.available_tags(&documents),
        None => all_tags(&documents),
    };

    output.print_tags(&tags)
}
