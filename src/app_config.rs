use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::formats::SubtitleFormat;

/// Application configuration module
/// Handles loading, validating and saving the settings used by the
/// command-line front end. The subtitle core itself takes no configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Extension of the format used when `convert` gets no `--to`
    #[serde(default = "default_output_format")]
    pub default_output_format: String,

    /// Sort cues by start time after loading
    #[serde(default)]
    pub sort_on_load: bool,

    /// Refuse to convert documents whose parse produced errors
    #[serde(default)]
    pub strict: bool,

    /// Files converted concurrently when the input is a directory
    #[serde(default = "default_max_parallel_files")]
    pub max_parallel_files: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_format() -> String {
    "srt".to_string()
}

fn default_max_parallel_files() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;

        if self.max_parallel_files == 0 {
            return Err(anyhow!("max_parallel_files must be at least 1"));
        }

        Ok(())
    }

    /// The configured default output format
    pub fn output_format(&self) -> Result<SubtitleFormat> {
        SubtitleFormat::by_extension(&self.default_output_format)
            .with_context(|| format!("Invalid default_output_format: {}", self.default_output_format))
    }

    /// Default config location: `<config dir>/subtypo/conf.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("subtypo")
            .join("conf.json")
    }

    /// Load a configuration file, writing a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_output_format: default_output_format(),
            sort_on_load: false,
            strict: false,
            max_parallel_files: default_max_parallel_files(),
            log_level: LogLevel::default(),
        }
    }
}
