use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sqassistant::config::{self, AssistantConfig, CliOverrides};

mod cmd;

#[derive(Parser)]
#[command(name = "sqassistant")]
#[command(version, about = "Start and quit application sections, keeping their session data")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Session file to use instead of the configured one (relative to the project dir)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the demo sections, then quit them and save the session
    Run {
        /// Force a demo section to fail its start (network, database, window)
        #[arg(long = "fail", value_name = "SECTION")]
        fail: Vec<String>,

        /// Do not roll back automatically when a section fails
        #[arg(long)]
        no_rollback: bool,

        /// Do not load or save any session data
        #[arg(long)]
        no_session: bool,

        /// Wait for Return before quitting
        #[arg(long)]
        wait: bool,
    },
    /// Show or clear the saved session
    Session {
        #[command(subcommand)]
        command: Option<SessionCommands>,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum SessionCommands {
    /// Print the stored section data
    Show,
    /// Delete the session file
    Clear,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Write a default .sqa/assistant.toml
    Init,
}

fn init_tracing(level: &str) {
    let valid = config::is_valid_log_level(level);
    let default_level = if valid {
        level.to_lowercase()
    } else {
        "info".to_string()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if !valid {
        tracing::warn!(level, "Invalid logging level, falling back to info");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let (no_session, no_rollback) = match &cli.command {
        Commands::Run {
            no_session,
            no_rollback,
            ..
        } => (*no_session, *no_rollback),
        _ => (false, false),
    };

    let config = AssistantConfig::new(project_dir)?.with_cli(CliOverrides {
        session_file: cli.session_file.clone(),
        no_session,
        no_rollback,
        verbose: cli.verbose,
    });
    init_tracing(config.log_level());

    match cli.command {
        Commands::Run { fail, wait, .. } => cmd::cmd_run(&config, &fail, wait)?,
        Commands::Session { command } => cmd::cmd_session(&config, command)?,
        Commands::Config { command } => cmd::cmd_config(&config, command)?,
    }

    Ok(())
}
