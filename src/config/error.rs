//! Config store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable location for the config file could be determined.
    #[error("could not determine a config file location")]
    NoConfigPath,

    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be written.
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns the path involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NoConfigPath => None,
            Self::Read { path, .. } | Self::Write { path, .. } => Some(path),
        }
    }
}
