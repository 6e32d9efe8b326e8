//! Error types for the rebalancer core.

use std::path::PathBuf;

use crate::folio::FolioError;

/// All errors that can occur in the rebalancer core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("blend error: {0}")]
    Blend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Folio(#[from] FolioError),

    #[error("failed to read state file {path}: {source}")]
    StateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write state file {path}: {source}")]
    StateWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse state JSON: {0}")]
    StateParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
