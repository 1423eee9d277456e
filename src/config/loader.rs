//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::{Config, CycleUnit};
use crate::config::validation::{resolve, IntervalPolicy, Settings};

/// File name of the configuration, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".polldot.json";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("HOME must be set")]
    Homeless,

    /// No configuration existed; a default one was written.
    #[error("new default configuration file created, please edit this file: {}", path.display())]
    Vanilla { path: PathBuf },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("poll interval {got:?} is below the minimum of {min:?}")]
    IntervalTooShort { got: Duration, min: Duration },

    #[error("poll interval of {length} {unit} exceeds the maximum of {max:?}")]
    IntervalTooLong {
        length: u64,
        unit: CycleUnit,
        max: Duration,
    },

    #[error("invalid url '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Home directory taken from `$HOME`.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => Err(ConfigError::Homeless),
    }
}

/// Reads, writes and resolves the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    policy: IntervalPolicy,
}

impl ConfigStore {
    /// Create a store for an explicit file path.
    pub fn new(path: impl Into<PathBuf>, policy: IntervalPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    /// Create a store for `~/.polldot.json`.
    pub fn in_home(policy: IntervalPolicy) -> Result<Self, ConfigError> {
        Ok(Self::new(home_dir()?.join(CONFIG_FILE_NAME), policy))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> IntervalPolicy {
        self.policy
    }

    /// Load and resolve the configuration.
    ///
    /// If the file does not exist, the default configuration is written to it
    /// and [`ConfigError::Vanilla`] is returned so the operator can edit it.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        match self.read() {
            Ok(config) => resolve(&config, self.policy),
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                self.write(&Config::default())?;
                tracing::warn!(
                    path = %self.path.display(),
                    "No configuration found, wrote defaults"
                );
                Err(ConfigError::Vanilla {
                    path: self.path.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Read the raw configuration file.
    pub fn read(&self) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write a configuration as indented JSON.
    pub fn write(&self, config: &Config) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(config).map_err(ConfigError::Encode)?;
        fs::write(&self.path, data).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
