use std::path::PathBuf;

use thiserror::Error;

/// Pharo context error types
#[derive(Error, Debug)]
pub enum ContextError {
    /// A required command-line argument was missing or empty
    #[error("Usage error: {0}")]
    Usage(String),

    /// The recipe file could not be read
    #[error("Failed to read recipe {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The recipe does not match the schema
    #[error("Invalid recipe: {0}")]
    Parse(String),

    /// Writing the output or one of its archive entries failed
    #[error("Failed to write {entry}: {source}")]
    Write {
        entry: String,
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for ContextError {
    fn from(err: serde_yaml::Error) -> Self {
        ContextError::Parse(err.to_string())
    }
}

/// Result type alias for build-context operations
pub type Result<T> = std::result::Result<T, ContextError>;
