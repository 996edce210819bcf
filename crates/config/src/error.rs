//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error - output file type not in the supported set
    #[error("file type '{file_type}' is not supported, supported file types: {supported}")]
    UnsupportedFileType {
        /// The configured file type
        file_type: String,
        /// Comma-separated list of supported types
        supported: String,
    },

    /// Validation error - output directory name is unusable
    #[error("output directory name '{name}' is invalid: {reason}")]
    InvalidDirectory {
        /// The configured directory name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Validation error - required field missing
    #[error("agent config is missing required field '{field}'")]
    MissingField {
        /// Missing field name
        field: &'static str,
    },
}

impl ConfigError {
    /// Create an UnsupportedFileType error
    pub fn unsupported_file_type(file_type: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedFileType {
            file_type: file_type.into(),
            supported: supported.join(", "),
        }
    }

    /// Create an InvalidDirectory error
    pub fn invalid_directory(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDirectory {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
