//! Domain error types
//!
//! This module defines the error hierarchy for Stockroom.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Stockroom error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum StockroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog API errors
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Validation errors (caller misuse, not user form errors)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Catalog API errors
///
/// Errors that occur when talking to the product service. Transport failures
/// and server rejections both land here; the message text of each variant is
/// what the user eventually sees, so keep it short.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not reach the server
    #[error("Network error: {0}")]
    ConnectionFailed(String),

    /// Server answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    /// 2xx response whose body was not the expected JSON
    #[error("Invalid JSON response")]
    InvalidResponse(String),

    /// Well-formed response with `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Request exceeded its deadline
    #[error("{0}")]
    Timeout(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::ConnectionFailed(_) | ApiError::Timeout(_) => true,
            ApiError::HttpStatus { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for StockroomError {
    fn from(err: std::io::Error) -> Self {
        StockroomError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for StockroomError {
    fn from(err: serde_json::Error) -> Self {
        StockroomError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StockroomError {
    fn from(err: toml::de::Error) -> Self {
        StockroomError::Configuration(format!("TOML parse error: {err}"))
    }
}
