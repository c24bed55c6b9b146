//! Configuration view and initialization — `sqassistant config`.

use anyhow::Result;
use console::style;

use sqassistant::config::{AssistantConfig, AssistantToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &AssistantConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_file();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Assistant Configuration");
            println!("=======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("Using default configuration (no {} found)", config_path.display());
            }
            println!();

            println!("[session]");
            match config.session_file() {
                Some(path) => println!("  file = \"{}\"", path.display()),
                None => println!("  enabled = false"),
            }
            println!();
            println!("[assistant]");
            println!("  auto_rollback = {}", config.auto_rollback());
            println!();
            println!("[logging]");
            println!("  level = \"{}\"", config.log_level());
            println!();

            for warning in config.validate() {
                println!("{} {}", style("warning:").yellow(), warning);
            }
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("assistant.toml already exists at {}", config_path.display());
                return Ok(());
            }
            AssistantToml::default().save(&config_path)?;
            println!("Created assistant.toml at {}", config_path.display());
        }
    }

    Ok(())
}
