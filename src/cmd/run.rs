//! Demo orchestration — `sqassistant run`.

use anyhow::{Context, Result};
use console::style;
use std::io::{BufRead, Write};

use sqassistant::config::AssistantConfig;
use sqassistant::demo;
use sqassistant::orchestrator::Assistant;

pub fn cmd_run(config: &AssistantConfig, fail: &[String], wait: bool) -> Result<()> {
    let sections = demo::sections(fail)?;
    let mut assistant = Assistant::new(sections, config.session_file(), config.auto_rollback());

    match assistant.session_file() {
        Some(path) => println!("Session file: {}", path.display()),
        None => println!("Session persistence disabled"),
    }
    println!();

    let started = assistant.start().context("Failed to start sections")?;

    if started {
        println!();
        println!("{} Successfully started", style("✓").green().bold());

        if wait {
            print!("Press [Return] to quit");
            std::io::stdout().flush().context("Failed to flush stdout")?;
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read from stdin")?;
        }

        println!();
        assistant.quit().context("Failed to quit sections")?;
        if assistant.store().is_enabled() {
            println!("Session saved");
        }
        return Ok(());
    }

    println!();
    println!("{} Start failed", style("✗").red().bold());
    for status in assistant.statuses() {
        let state = if status.started {
            style("started").green()
        } else {
            style("not reached").dim()
        };
        println!("  {:<10} {}", status.name, state);
    }
    println!();
    if !assistant.auto_rollback() {
        println!("Doing rollback now");
        assistant.rollback().context("Failed to roll back sections")?;
    }
    println!("Rolled back");

    anyhow::bail!("Start failed, started sections were rolled back")
}
