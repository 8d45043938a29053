//! Splash cursor error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuring the cursor effect
#[derive(Error, Debug)]
pub enum SplashError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config could not be written out as TOML
    #[error("failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Result type for splash cursor operations
pub type Result<T> = std::result::Result<T, SplashError>;
