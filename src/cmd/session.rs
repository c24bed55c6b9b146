//! Session inspection — `sqassistant session`.

use anyhow::{Context, Result};
use console::style;

use sqassistant::config::AssistantConfig;
use sqassistant::session::SessionStore;

use super::super::SessionCommands;

pub fn cmd_session(config: &AssistantConfig, command: Option<SessionCommands>) -> Result<()> {
    let store = SessionStore::new(config.session_file());
    let Some(path) = store.path() else {
        println!("Session persistence disabled");
        return Ok(());
    };

    match command {
        None | Some(SessionCommands::Show) => {
            let Some(record) = store
                .load_record()
                .with_context(|| format!("Failed to load session from {}", path.display()))?
            else {
                println!("No session saved at {}", path.display());
                return Ok(());
            };

            println!("Session file: {}", path.display());
            println!("Saved at: {}", record.saved_at.to_rfc3339());
            println!("Format version: {}", record.version);
            println!();
            for (index, data) in record.sections.iter().enumerate() {
                let json =
                    serde_json::to_string(data).context("Failed to render section data")?;
                println!("  {} {}", style(format!("[{}]", index)).dim(), json);
            }
            println!();
        }
        Some(SessionCommands::Clear) => {
            if store.clear()? {
                println!("Session cleared ({})", path.display());
            } else {
                println!("No session to clear");
            }
        }
    }

    Ok(())
}
