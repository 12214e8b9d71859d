//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reviewlens operations.
///
/// Only whole-input failures are errors. Problems inside individual records
/// (missing fields, malformed flags, unknown categories) are normalized at the
/// load boundary and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be interpreted as a record collection
    #[error("Dataset error in {path}: {message}")]
    Dataset { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// CSV errors
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a dataset error with path context
    pub fn dataset(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Dataset {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
