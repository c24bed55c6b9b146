//! Configuration for the assistant, read from `.sqa/assistant.toml`.
//!
//! Settings are layered file → environment → CLI:
//!
//! ```toml
//! [session]
//! enabled = true
//! file = "last.session"   # relative paths resolve against .sqa/
//!
//! [assistant]
//! auto_rollback = true
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Environment overrides: `SQA_SESSION_FILE`, `SQA_AUTO_ROLLBACK`,
//! `SQA_LOG_LEVEL`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding config and session files, relative to the project.
pub const CONFIG_DIR: &str = ".sqa";
pub const CONFIG_FILE: &str = "assistant.toml";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Whether `level` names a tracing level (case-insensitive).
pub fn is_valid_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_lowercase().as_str())
}

fn default_true() -> bool {
    true
}

fn default_session_file() -> PathBuf {
    PathBuf::from("last.session")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    /// Persist section data between runs
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Session file, relative to the config directory unless absolute
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            enabled: true,
            file: default_session_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantSection {
    /// Quit already started sections when one fails to start
    #[serde(default = "default_true")]
    pub auto_rollback: bool,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            auto_rollback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default tracing level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The complete assistant.toml structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssistantToml {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub assistant: AssistantSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AssistantToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse assistant.toml")
    }

    /// Load `assistant.toml` from `config_dir`, or defaults if it is missing.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize assistant.toml")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in
    /// production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup("SQA_SESSION_FILE") {
            if file.is_empty() {
                self.session.enabled = false;
            } else {
                self.session.enabled = true;
                self.session.file = PathBuf::from(file);
            }
        }
        if let Some(value) = lookup("SQA_AUTO_ROLLBACK") {
            self.assistant.auto_rollback = parse_bool(&value)
                .with_context(|| format!("Invalid SQA_AUTO_ROLLBACK '{}'", value))?;
        }
        if let Some(level) = lookup("SQA_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !is_valid_log_level(&self.logging.level) {
            warnings.push(format!(
                "Invalid logging level '{}'. Valid values: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.session.enabled && self.session.file.as_os_str().is_empty() {
            warnings.push("Session is enabled but session.file is empty".to_string());
        }

        warnings
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected true/false"),
    }
}

/// CLI overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub session_file: Option<PathBuf>,
    pub no_session: bool,
    pub no_rollback: bool,
    pub verbose: bool,
}

/// Effective configuration after merging file, environment and CLI.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub project_dir: PathBuf,
    pub config_dir: PathBuf,
    pub toml: AssistantToml,
    pub cli: CliOverrides,
}

impl AssistantConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        Self::with_env(project_dir, |key| std::env::var(key).ok())
    }

    pub fn with_env<F>(project_dir: PathBuf, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_dir = project_dir.join(CONFIG_DIR);
        let mut toml = AssistantToml::load_or_default(&config_dir)?;
        toml.apply_env(lookup)?;

        Ok(Self {
            project_dir,
            config_dir,
            toml,
            cli: CliOverrides::default(),
        })
    }

    pub fn with_cli(mut self, cli: CliOverrides) -> Self {
        self.cli = cli;
        self
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Session file to use, or `None` when persistence is disabled.
    ///
    /// A relative CLI path resolves against the project directory.
    pub fn session_file(&self) -> Option<PathBuf> {
        if self.cli.no_session {
            return None;
        }
        if let Some(ref file) = self.cli.session_file {
            return Some(self.project_dir.join(file));
        }
        if !self.toml.session.enabled {
            return None;
        }
        Some(self.config_dir.join(&self.toml.session.file))
    }

    pub fn auto_rollback(&self) -> bool {
        !self.cli.no_rollback && self.toml.assistant.auto_rollback
    }

    /// Default level for the tracing filter.
    pub fn log_level(&self) -> &str {
        if self.cli.verbose {
            "debug"
        } else {
            &self.toml.logging.level
        }
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
