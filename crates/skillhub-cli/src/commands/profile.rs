//! Profile command handlers

use anyhow::{bail, Result};

use crate::app::App;
use crate::output::Output;

const EDITABLE_FIELDS: &str = "name, rollNumber, major, yearOfStudy, contact, avatarUrl";

/// Show the logged-in profile
pub fn show(app: &mut App, output: &Output) -> Result<()> {
    let record = app.require_login()?;
    output.print_profile(&record.profile)
}

/// Change one profile field
pub fn set(app: &mut App, field: String, value: String, output: &Output) -> Result<()> {
    let record = app.require_login()?;

    if field == "email" {
        bail!("The email address identifies the account and cannot be changed.");
    }

    let mut profile = record.profile.clone();
    if !profile.set_field(&field, value.clone()) {
        bail!(
            "Unknown profile field: '{}'\nValid fields: {}",
            field,
            EDITABLE_FIELDS
        );
    }

    app.store.update_profile(record.identity().as_str(), profile)?;
    output.success(&format!("Set {} = {}", field, value));
    Ok(())
}
