//! Error types for the flight data hub.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all hub operations.
///
/// Inside background fetch tasks these errors are never propagated across
/// the task boundary: they are folded into the `status` string of the record
/// that the task hands back. Only configuration and setup paths return them
/// to the caller.
#[derive(Error, Debug)]
pub enum HubError {
    /// Network failure, timeout or non-success HTTP status
    #[error("Transport error for '{url}': {message}")]
    Transport { url: String, message: String },
    /// Mandatory key missing, of the wrong type, or payload not parseable
    #[error("Schema violation at '{path}'")]
    SchemaViolation { path: String },
    /// Invalid or unparseable configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// No configured CDM server serves the airport
    #[error("No CDM feed found for airport '{icao}'")]
    NotFound { icao: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Builder for transport errors bound to a URL.
pub struct TransportErrorBuilder {
    url: String,
}

impl TransportErrorBuilder {
    /// Create a new transport error builder for a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build the error with the given message.
    pub fn with_message(self, message: impl fmt::Display) -> HubError {
        HubError::Transport {
            url: self.url,
            message: message.to_string(),
        }
    }
}

impl HubError {
    /// Creates a builder for transport errors.
    pub fn transport(url: impl Into<String>) -> TransportErrorBuilder {
        TransportErrorBuilder::new(url)
    }

    /// Creates a schema violation for a dotted key path.
    pub fn schema(path: impl Into<String>) -> Self {
        HubError::SchemaViolation { path: path.into() }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        HubError::Configuration {
            message: message.into(),
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add lazy context to any error type, converting to HubError.
    fn with_context_lazy<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context_lazy<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| HubError::Configuration {
            message: format!("{}: {}", f(), e),
        })
    }
}

/// Result type alias for hub operations
pub type Result<T> = std::result::Result<T, HubError>;
