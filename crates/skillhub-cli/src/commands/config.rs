//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use skillhub_core::Config;

use crate::output::{Output, OutputFormat};

const VALID_KEYS: &str = "data_dir, backend, email_domain, max_upload_bytes, seed_file, log_file";

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "backend": config.backend.to_string(),
                    "email_domain": config.email_domain,
                    "max_upload_bytes": config.max_upload_bytes,
                    "seed_file": config.seed_file,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!("  backend:          {}", config.backend);
            println!(
                "  email_domain:     {}",
                config.email_domain.as_deref().unwrap_or("(any)")
            );
            println!("  max_upload_bytes: {}", config.max_upload_bytes);
            println!("  seed_file:        {}", display_path(config.seed_file.as_ref()));
            println!("  log_file:         {}", display_path(config.log_file.as_ref()));
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "backend" => {
            config.backend = value.parse()?;
        }
        "email_domain" => {
            config.email_domain = optional(value);
        }
        "max_upload_bytes" => {
            config.max_upload_bytes = value
                .parse()
                .context("Invalid value for max_upload_bytes. Use a number of bytes.")?;
        }
        "seed_file" => {
            config.seed_file = optional(value).map(PathBuf::from);
        }
        "log_file" => {
            config.log_file = optional(value).map(PathBuf::from);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

/// Empty string or "none" clears an optional setting
fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}
