//! Configuration management for chronoform
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::adapter::NowPolicy;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_NOW_WINDOW_SECONDS, NOW_WINDOW_MAX_SECONDS};
use crate::format::DisplayFormat;
use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Display format for the string accessors: one strftime string, or a
    /// `date` / `time` table
    pub format: DisplayFormat,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// Ambiguity policy names as they appear in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NowPolicyKind {
    /// Values near the current instant need the word "now"
    Keyword,
    /// Values equal to the current instant are always rejected
    Exact,
}

/// Parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub now_policy: NowPolicyKind,
    /// Window around the current instant for the keyword policy, in seconds
    pub now_window_seconds: i64,
    /// Generate date-only and time-only accessors
    pub split_accessors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Level filter: "error", "warn", "info", "debug" or "trace"
    pub level: String,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            now_policy: NowPolicyKind::Keyword,
            now_window_seconds: DEFAULT_NOW_WINDOW_SECONDS,
            split_accessors: false,
        }
    }
}

impl ParsingConfig {
    pub fn now_policy(&self) -> NowPolicy {
        match self.now_policy {
            NowPolicyKind::Keyword => NowPolicy::keyword(self.now_window_seconds),
            NowPolicyKind::Exact => NowPolicy::ExactMatch,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Effective level filter, `Off` when logging is disabled
    pub fn level_filter(&self) -> Result<LevelFilter> {
        if !self.enabled {
            return Ok(LevelFilter::Off);
        }
        LevelFilter::from_str(&self.level).map_err(|_| anyhow::anyhow!("Invalid log level '{}'", self.level))
    }
}

impl Config {
    /// Load the first config file found, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `chronoform.toml` in the working directory wins over the user config dir
    fn find_config_file() -> Option<PathBuf> {
        let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), Self::default_config_path().ok()];
        candidates.into_iter().flatten().find(|path| path.exists())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.format.validate() {
            anyhow::bail!("Invalid format: {}", e);
        }

        if !(1..=NOW_WINDOW_MAX_SECONDS).contains(&self.parsing.now_window_seconds) {
            anyhow::bail!(
                "now_window_seconds must be between 1 and {}, got {}",
                NOW_WINDOW_MAX_SECONDS,
                self.parsing.now_window_seconds
            );
        }

        if self.logging.enabled {
            self.logging.level_filter()?;
        }

        Ok(())
    }

    /// Write the default configuration to `path`, creating parent directories
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let body = toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")?;
        let content = format!(
            "# chronoform Configuration File\n# Generated on {}\n\n{}",
            chrono::Local::now().format("%Y-%m-%d"),
            body
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        std::fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path.display()))?;

        log::info!("Generated default configuration file: {}", path.display());
        Ok(())
    }

    /// Per-user directory holding `config.toml`
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(base.join(CONFIG_DIR_NAME))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
