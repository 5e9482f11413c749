//! Error model for the fallible write paths.
//!
//! None of these errors ever reach a caller of the public logging calls; they
//! exist so the internal `try_*` functions can use `?` and so the swallowing
//! wrappers have something concrete to report.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used by the internal write paths.
pub type LogResult<T> = Result<T, LogError>;

#[derive(Debug, Error)]
pub enum LogError {
    /// The log directory (or one of its parents) could not be created.
    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log line or snapshot file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded as JSON.
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The optional configuration file could not be read or parsed.
    #[error("invalid logger configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl LogError {
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
