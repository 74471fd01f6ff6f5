//! Error types for the preview CLI.

use std::path::PathBuf;

use safebook::MathError;

/// All errors that can occur while producing previews.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("unknown book '{0}' (try 'books')")]
    UnknownBook(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode preview: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for this error: 2 for bad usage, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
