//! Configuration file support
//!
//! Optional TOML defaults for the command-line flags. Lookup order:
//! `./bordercrop.toml`, then `<config dir>/bordercrop/config.toml`.
//! Flags given on the command line always win.
//!
//! ```toml
//! border_size = 4
//! verbose = false
//! show = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pipeline::CropOptions;

/// Local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "bordercrop.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Defaults loaded from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub border_size: Option<u32>,
    pub verbose: Option<bool>,
    pub show: Option<bool>,
}

/// Values set explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub border_size: Option<u32>,
    pub verbose: Option<bool>,
    pub show: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Search the default locations; missing files yield the defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Candidate files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bordercrop").join("config.toml"));
        }
        paths
    }

    /// Resolve run options: command line, then this file, then defaults
    pub fn merge_with_cli(
        &self,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        cli: &CliOverrides,
    ) -> CropOptions {
        let defaults = CropOptions::new(input_path, output_path);
        CropOptions {
            border_size: cli
                .border_size
                .or(self.border_size)
                .unwrap_or(defaults.border_size),
            verbose: cli.verbose.or(self.verbose).unwrap_or(defaults.verbose),
            show: cli.show.or(self.show).unwrap_or(defaults.show),
            ..defaults
        }
    }
}
