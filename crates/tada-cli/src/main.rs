//! tada CLI
//!
//! Command-line client for a remote todo service.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tada_core::{ApiClient, Config, SessionStore};

mod commands;
mod output;
mod prompt;
mod shell;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tada")]
#[command(about = "tada - todos from the command line")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a different config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell
    Shell,
    /// Log in and remember the session
    Login {
        /// Account email
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show service and session status
    Status,
    /// List all todos
    #[command(alias = "ls")]
    List,
    /// Add a todo
    Add {
        /// Todo text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Mark a todo done, or open again
    #[command(alias = "done")]
    Toggle {
        /// Todo ID
        id: String,
    },
    /// Replace a todo's text
    Edit {
        /// Todo ID
        id: String,
        /// New text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        /// Todo ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a session
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let session = match SessionStore::open(config.session_path()) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("{}", hint);
            }
            return Err(e).context("Failed to open session");
        }
    };
    let api = ApiClient::from_config(&config, session);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run(api).await,
        Commands::Login { email, password } => {
            commands::auth::login(&api, email, password, &output).await
        }
        Commands::Logout => commands::auth::logout(&api, &output),
        Commands::Status => commands::status::show(&api, &output),
        Commands::List => commands::todo::list(&api, &output).await,
        Commands::Add { text } => commands::todo::add(&api, text, &output).await,
        Commands::Toggle { id } => commands::todo::toggle(&api, id, &output).await,
        Commands::Edit { id, text } => commands::todo::edit(&api, id, text, &output).await,
        Commands::Delete { id, yes } => commands::todo::delete(&api, id, yes, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging when TADA_LOG is set
///
/// Writes to the configured log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TADA_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("tada_core={},tada_cli={}", log_level, log_level));

    match &config.log_file {
        Some(log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
