//! Error types for flick_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading or validating a [`FlickConfig`](crate::config::FlickConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors loading a recorded input [`Trace`](crate::trace::Trace)
#[derive(Error, Debug)]
pub enum TraceError {
    /// The trace file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trace is not valid JSON for this schema
    #[error("failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),
}
