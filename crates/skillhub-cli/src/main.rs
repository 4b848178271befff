//! SkillHub CLI
//!
//! Command-line interface for SkillHub - a personal document locker.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use skillhub_core::{Config, Section, SortDirection, SortKey, StorageError};

mod app;
mod commands;
mod output;
mod prompt;

use app::App;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "skillhub")]
#[command(about = "SkillHub - Keep your certificates, notes and coursework in one place")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, creating the account on first use
    Login {
        /// Institutional email address
        email: String,
        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Manage documents
    #[command(alias = "docs")]
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// List tags in use
    Tags {
        /// Show the tags offered by a section instead
        #[arg(short, long)]
        section: Option<Section>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show profile details
    Show,
    /// Set a profile field (name, rollNumber, major, yearOfStudy, contact, avatarUrl)
    Set {
        field: String,
        value: String,
    },
}

#[derive(Subcommand)]
enum DocCommands {
    /// List documents
    #[command(alias = "ls")]
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,
        /// Only documents with any of these tags
        #[arg(short, long)]
        tag: Vec<String>,
        /// Sort field
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort descending
        #[arg(long, conflicts_with = "asc")]
        desc: bool,
        /// Section preset (dashboard, skills, certificates, curriculum)
        #[arg(long)]
        section: Option<Section>,
    },
    /// Upload a file as a new document
    #[command(alias = "upload")]
    Add {
        /// File to upload
        path: PathBuf,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show document details
    Show {
        /// Document ID (full or prefix)
        id: String,
    },
    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        /// Document ID (full or prefix)
        id: String,
        /// Delete without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Open a document with the system handler
    Open {
        /// Document ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, email_domain, max_upload_bytes, seed_file, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::UploadDate,
            SortArg::Name => SortKey::Name,
        }
    }
}

fn direction_from_flags(asc: bool, desc: bool) -> Option<SortDirection> {
    match (asc, desc) {
        (true, _) => Some(SortDirection::Asc),
        (_, true) => Some(SortDirection::Desc),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        if let Some(hint) = storage_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

/// Recovery suggestion for a storage failure anywhere in the error chain
fn storage_hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| {
            cause.downcast_ref::<StorageError>().or_else(|| {
                match cause.downcast_ref::<skillhub_core::Error>() {
                    Some(skillhub_core::Error::Storage(e)) => Some(e),
                    _ => None,
                }
            })
        })
        .and_then(StorageError::recovery_suggestion)
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    init_logging(&config);

    let mut app = App::open(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut app, email, password, &output)
        }
        Commands::Logout => commands::auth::logout(&mut app, &output),
        Commands::Whoami => commands::auth::whoami(&mut app, &output),
        Commands::Profile { command } => match command {
            Some(ProfileCommands::Show) | None => commands::profile::show(&mut app, &output),
            Some(ProfileCommands::Set { field, value }) => {
                commands::profile::set(&mut app, field, value, &output)
            }
        },
        Commands::Doc { command } => handle_doc_command(command, &mut app, &output).await,
        Commands::Tags { section } => commands::tag::list(&mut app, section, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_doc_command(command: DocCommands, app: &mut App, output: &Output) -> Result<()> {
    match command {
        DocCommands::List {
            search,
            tag,
            sort,
            asc,
            desc,
            section,
        } => {
            let args = commands::doc::ListArgs {
                search,
                tags: tag,
                sort_key: sort.map(SortKey::from),
                sort_direction: direction_from_flags(asc, desc),
                section: section.unwrap_or(Section::Dashboard),
            };
            commands::doc::list(app, args, output)
        }
        DocCommands::Add { path, tag, name } => {
            commands::doc::add(app, path, tag, name, output).await
        }
        DocCommands::Show { id } => commands::doc::show(app, id, output),
        DocCommands::Delete { id, yes } => commands::doc::delete(app, id, yes, output),
        DocCommands::Open { id } => commands::doc::open(app, id, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Initialize logging
///
/// Only initializes if SKILLHUB_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SKILLHUB_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "skillhub_core={},skillhub_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_doc_list_flags() {
        let cli = Cli::try_parse_from([
            "skillhub", "doc", "ls", "--search", "notes", "-t", "Skill", "-t", "React", "--sort",
            "name", "--desc", "--section", "skills",
        ])
        .unwrap();

        match cli.command {
            Commands::Doc {
                command:
                    DocCommands::List {
                        search,
                        tag,
                        sort,
                        asc,
                        desc,
                        section,
                    },
            } => {
                assert_eq!(search.as_deref(), Some("notes"));
                assert_eq!(tag, vec!["Skill", "React"]);
                assert!(matches!(sort, Some(SortArg::Name)));
                assert!(!asc && desc);
                assert_eq!(section, Some(Section::Skills));
            }
            _ => panic!("expected doc list"),
        }
    }

    #[test]
    fn test_asc_and_desc_conflict() {
        assert!(Cli::try_parse_from(["skillhub", "doc", "ls", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn test_direction_from_flags() {
        assert_eq!(direction_from_flags(false, false), None);
        assert_eq!(direction_from_flags(true, false), Some(SortDirection::Asc));
        assert_eq!(direction_from_flags(false, true), Some(SortDirection::Desc));
    }

    #[test]
    fn test_storage_hint_through_context() {
        let core_err: skillhub_core::Error =
            StorageError::corrupt("skillhub_users", "bad json").into();
        let err = anyhow::Error::from(core_err).context("Failed to log in");
        assert!(storage_hint(&err).is_some());

        let plain = anyhow::anyhow!("Not logged in.");
        assert!(storage_hint(&plain).is_none());
    }

    #[test]
    fn test_parse_doc_rm_yes() {
        let cli = Cli::try_parse_from(["skillhub", "doc", "rm", "ab12", "-y"]).unwrap();
        match cli.command {
            Commands::Doc {
                command: DocCommands::Delete { id, yes },
            } => {
                assert_eq!(id, "ab12");
                assert!(yes);
            }
            _ => panic!("expected doc rm"),
        }

        let cli = Cli::try_parse_from(["skillhub", "doc", "delete", "ab12"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Doc {
                command: DocCommands::Delete { yes: false, .. }
            }
        ));
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["skillhub", "whoami", "--json"]).unwrap();
        assert!(cli.json);
    }
}
