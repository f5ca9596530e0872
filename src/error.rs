// src/error.rs

//! Unified error handling for the downloader.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for downloader operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Destination root missing or unwritable
    #[error("Filesystem error at {path}: {message}")]
    Filesystem { path: PathBuf, message: String },

    /// Result markup no longer matches the expected shape
    #[error("Catalog markup changed ({field}): {message}")]
    Schema { field: String, message: String },

    /// Direct lookup of an explicit code failed
    #[error("Lookup failed for #{code}: {message}")]
    Lookup { code: String, message: String },

    /// Playlist provider error
    #[error("Playlist error: {0}")]
    Playlist(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a filesystem setup error.
    pub fn filesystem(path: &Path, message: impl fmt::Display) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create a markup schema mismatch error for a required field.
    pub fn schema(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Create a lookup error for an explicit code.
    pub fn lookup(code: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Lookup {
            code: code.into(),
            message: message.to_string(),
        }
    }

    /// Create a playlist provider error.
    pub fn playlist(message: impl Into<String>) -> Self {
        Self::Playlist(message.into())
    }

    /// Whether this error should stop the whole batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Filesystem { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::schema("date", "missing").is_fatal());
        assert!(AppError::filesystem(Path::new("/nope"), "missing").is_fatal());
        assert!(!AppError::lookup("XYZ99", "timeout").is_fatal());
        assert!(!AppError::playlist("bad link").is_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::lookup("XYZ99", "no title");
        assert_eq!(err.to_string(), "Lookup failed for #XYZ99: no title");

        let err = AppError::schema("title", "header missing");
        assert_eq!(
            err.to_string(),
            "Catalog markup changed (title): header missing"
        );
    }
}
