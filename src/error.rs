//! Error types for ftp-relay
//!
//! This module provides:
//! - The library error type, with one variant per failure class of the relay
//!   (connection, transfer, timeout, directory listing, configuration)
//! - HTTP status code mapping for API integration
//! - The JSON error body returned by the API

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for ftp-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ftp-relay
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "transfer.batch_size")
        key: Option<String>,
    },

    /// Could not establish or authenticate a session, or the session was lost
    #[error("connection error: {0}")]
    Connection(String),

    /// Downloading a specific path failed
    #[error("transfer of {path} failed: {message}")]
    Transfer {
        /// Remote path that was requested
        path: String,
        /// Reason reported by the transport
        message: String,
    },

    /// A transfer exceeded the configured per-transfer timeout
    #[error("transfer of {path} timed out after {timeout_ms} ms")]
    TransferTimeout {
        /// Remote path that was requested
        path: String,
        /// The timeout that was exceeded
        timeout_ms: u64,
    },

    /// Listing a remote directory failed
    #[error("listing {path} failed: {message}")]
    DirectoryList {
        /// Remote directory that was listed
        path: String,
        /// Reason reported by the transport
        message: String,
    },

    /// The request was understood but cannot be served as given
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An HTTP request outlived the whole-request deadline
    #[error("request timed out after {timeout_ms} ms")]
    RequestTimeout {
        /// The deadline that was exceeded
        timeout_ms: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the session can no longer be used
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

/// API error response format
///
/// Returned by every endpoint that fails as a whole.
///
/// ```json
/// { "success": false, "error": "connection error: refused", "code": "connection_error" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `false`
    pub success: bool,

    /// Human-readable error message
    pub error: String,

    /// Machine-readable error code (e.g., "connection_error")
    pub code: String,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
        }
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // Client-side rejections the relay makes itself
            Error::InvalidRequest(_) => 400,
            Error::RequestTimeout { .. } => 408,

            // Everything else surfaces as a plain server failure
            Error::Config { .. }
            | Error::Connection(_)
            | Error::Transfer { .. }
            | Error::TransferTimeout { .. }
            | Error::DirectoryList { .. }
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::ApiServerError(_)
            | Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Connection(_) => "connection_error",
            Error::Transfer { .. } => "transfer_error",
            Error::TransferTimeout { .. } => "transfer_timeout",
            Error::DirectoryList { .. } => "directory_list_error",
            Error::InvalidRequest(_) => "invalid_request",
            Error::RequestTimeout { .. } => "request_timeout",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::new(error.error_code(), error.to_string())
    }
}
