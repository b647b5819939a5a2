//! Error types for the Aitable node
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for the Aitable node
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Input Validation Errors
    // ============================================================================
    #[error("{label} is required")]
    MissingParameter { label: String },

    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // Remote API Errors
    // ============================================================================
    #[error("Failed to fetch field metadata: {message}. Disable \"Fetch Fields\" or check your connection to Aitable.")]
    FieldMetadata { message: String },

    #[error("Error {action} in datasheet {datasheet_id}: {source}")]
    Remote {
        action: &'static str,
        datasheet_id: String,
        record_id: Option<String>,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Item Errors
    // ============================================================================
    #[error("Error during {operation} operation on item {item_index}: {source}")]
    Item {
        operation: String,
        item_index: usize,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing parameter error from its display label
    pub fn missing(label: impl Into<String>) -> Self {
        Self::MissingParameter {
            label: label.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a field metadata error
    pub fn field_metadata(message: impl Into<String>) -> Self {
        Self::FieldMetadata {
            message: message.into(),
        }
    }

    /// Wrap a failed record sub-request
    pub fn remote(
        action: &'static str,
        datasheet_id: impl Into<String>,
        record_id: Option<String>,
        source: Error,
    ) -> Self {
        Self::Remote {
            action,
            datasheet_id: datasheet_id.into(),
            record_id,
            source: Box::new(source),
        }
    }

    /// Attribute an error to an operation and the input item that caused it
    pub fn item(operation: impl Into<String>, item_index: usize, source: Error) -> Self {
        Self::Item {
            operation: operation.into(),
            item_index,
            source: Box::new(source),
        }
    }

    /// Whether this error was caused by bad input rather than the remote side
    pub fn is_validation(&self) -> bool {
        match self {
            Error::MissingParameter { .. }
            | Error::InvalidParameter { .. }
            | Error::UnknownOperation(_) => true,
            Error::Item { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// HTTP status code behind this error, if one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::Remote { source, .. } | Error::Item { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Error body returned by the remote API, parsed as JSON when possible
    pub fn error_details(&self) -> Option<Value> {
        match self {
            Error::HttpStatus { body, .. } if !body.is_empty() => Some(
                serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone())),
            ),
            Error::Remote { source, .. } | Error::Item { source, .. } => source.error_details(),
            _ => None,
        }
    }
}

/// Result type alias for the Aitable node
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
