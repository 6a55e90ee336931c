//! # Storage Layer
//!
//! Configuration files. Documents themselves are read by
//! [`crate::document`]; nothing is persisted between runs.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Project config | TOML | `taskdeps.toml` (current or any parent directory) |
//! | Global config | TOML | `~/.config/taskdeps/config.toml` |

mod config;

pub use config::{
    Config, ConfigError, ConfigFile, InferenceConfig, OutputConfig, PROJECT_CONFIG_FILE,
};
