//! Error types for report runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error from a store backend.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout tagsize.
pub type Result<T, E = ReportError> = std::result::Result<T, E>;

/// Errors that abort a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The store could not be opened or queried.
    #[error("Store unavailable: {source}")]
    StoreUnavailable {
        #[source]
        source: BoxError,
    },

    /// A recorded path can no longer be stat'ed.
    #[error("Path unavailable: {path}: {source}")]
    PathUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },
}

impl ReportError {
    /// Wrap a store backend error.
    pub fn store(source: impl Into<BoxError>) -> Self {
        Self::StoreUnavailable {
            source: source.into(),
        }
    }

    /// Create a path error with path context.
    pub fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }
}

/// A path that was charged zero bytes because it could not be stat'ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPath {
    /// Path that could not be resolved.
    pub path: PathBuf,
    /// Human-readable reason.
    pub message: String,
}

impl SkippedPath {
    /// Create a skipped path record from the failed lookup.
    pub fn new(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
