//! Configuration handling for taskdeps
//!
//! Configuration is read from `taskdeps.toml` (project, found by walking up
//! from the working directory) and `~/.config/taskdeps/config.toml` (global).
//! Project values override global ones; command-line flags override both.
//!
//! ```toml
//! [inference]
//! threshold = 70
//!
//! [output]
//! default_format = "json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::inference::DEFAULT_THRESHOLD;

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "taskdeps.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Inference settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Minimum confidence for auto-applied edges (0-100)
    pub threshold: Option<u8>,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text or json)
    pub default_format: Option<OutputFormat>,
}

/// Contents of one configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub inference: InferenceConfig,
    pub output: OutputConfig,
}

impl ConfigFile {
    /// Parses and validates TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.inference.threshold {
            Some(t) if t > 100 => Err(ConfigError::Invalid(format!(
                "inference.threshold must be between 0 and 100, got {}",
                t
            ))),
            _ => Ok(()),
        }
    }

    fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ConfigFile,
    pub global: ConfigFile,
    pub project_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Self::load_from(&cwd)
    }

    /// Loads global configuration plus the project file found above `start`
    pub fn load_from(start: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project_path = Self::find_project_config(start);
        let project = match &project_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        Ok(Self {
            project,
            global,
            project_path,
        })
    }

    /// Loads global configuration plus an explicit project file
    pub fn with_project_file(path: &Path) -> Result<Self> {
        Ok(Self {
            project: ConfigFile::load(path)?,
            global: Self::load_global()?,
            project_path: Some(path.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskdeps", "taskdeps").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<ConfigFile> {
        let config_path = match Self::global_config_dir() {
            Some(dir) => dir.join("config.toml"),
            None => return Ok(ConfigFile::default()),
        };

        if !config_path.exists() {
            return Ok(ConfigFile::default());
        }

        ConfigFile::load(&config_path)
    }

    /// Finds `taskdeps.toml` in `start` or any parent directory
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Effective auto-apply threshold
    pub fn threshold(&self) -> u8 {
        self.project
            .inference
            .threshold
            .or(self.global.inference.threshold)
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Effective default output format
    pub fn default_format(&self) -> OutputFormat {
        self.project
            .output
            .default_format
            .or(self.global.output.default_format)
            .unwrap_or_default()
    }
}
