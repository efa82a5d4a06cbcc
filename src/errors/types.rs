//! Error type definitions for the sports-webcast application

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Every fallible operation outside the merge engine converts into this enum,
/// so the CLI and scheduler only ever deal with one error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Feed snapshot / resolved stream document errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Persisted playlist errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Schedule errors
    #[error("Schedule error: {expression} - {message}")]
    Schedule { expression: String, message: String },
}

/// Errors raised while loading producer documents
#[derive(Error, Debug)]
pub enum FeedError {
    /// Document could not be read from disk
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON for the expected schema
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Unknown reference timezone
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

/// Errors raised while persisting the playlist
#[derive(Error, Debug)]
pub enum StoreError {
    /// Destination directory could not be prepared
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temporary file could not be written
    #[error("Failed to write temporary playlist in {}: {source}", dir.display())]
    Write {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic rename into place failed
    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a schedule error
    pub fn schedule<E: Into<String>, M: Into<String>>(expression: E, message: M) -> Self {
        Self::Schedule {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        Self::configuration(err.to_string())
    }
}
