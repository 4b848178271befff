//! Login, logout and session commands

use anyhow::{Context, Result};

use skillhub_core::validate_login;

use crate::app::App;
use crate::output::{Output, OutputFormat};
use crate::prompt::read_password;

/// Log in, registering the identity on first use
pub fn login(app: &mut App, email: String, password: Option<String>, output: &Output) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    validate_login(&email, &password, app.config.email_domain.as_deref())?;

    let is_new = app.store.is_new_identity(&email)?;
    let seed = if is_new { app.seed()? } else { Vec::new() };

    let record = app.store.authenticate_or_register(&email, &password, &seed)?;
    app.session.login(&record).context("Failed to save session")?;

    let identity = record.identity();
    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "email": identity.as_str(),
                "registered": is_new,
                "documents": record.documents.len()
            })
        );
    } else if is_new {
        output.success(&format!(
            "Created account for {} ({} starter document(s))",
            identity,
            record.documents.len()
        ));
    } else {
        output.success(&format!("Logged in as {}", identity));
    }

    Ok(())
}

/// End the current session
pub fn logout(app: &mut App, output: &Output) -> Result<()> {
    // Load the token first so there is something to report
    let was = app.session.load()?;
    app.session.logout()?;

    match was {
        Some(identity) => output.success(&format!("Logged out {}", identity)),
        None => output.message("Not logged in."),
    }
    Ok(())
}

/// Show the current identity
pub fn whoami(app: &mut App, output: &Output) -> Result<()> {
    let record = app.session.restore_session()?;

    match (record, output.format) {
        (Some(record), OutputFormat::Json) => {
            println!(
                "{}",
                serde_json::json!({
                    "email": record.profile.email,
                    "name": record.profile.name,
                    "documents": record.documents.len()
                })
            );
        }
        (Some(record), OutputFormat::Quiet) => println!("{}", record.profile.email),
        (Some(record), OutputFormat::Human) => {
            println!("{} <{}>", record.profile.name, record.profile.email);
            println!("{} document(s)", record.documents.len());
        }
        (None, OutputFormat::Json) => println!("{}", serde_json::json!({ "email": null })),
        (None, _) => output.message("Not logged in."),
    }

    Ok(())
}
