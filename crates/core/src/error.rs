use std::io;
use std::path::PathBuf;

/// Errors that can occur while selecting, configuring or running a backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown interpreter '{name}', expected one of: {}", known.join(", "))]
    UnknownBackend { name: String, known: Vec<String> },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to stage {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for runtests operations
pub type Result<T> = std::result::Result<T, Error>;
