//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output at a configurable level
//! - Optional JSON file logging with rotation
//! - Helper macros for the events every upload emits
//!
//! # Example
//!
//! ```no_run
//! use stockroom::logging::init_logging;
//! use stockroom::config::LoggingConfig;
//!
//! # fn example() -> stockroom::domain::Result<()> {
//! let _guard = init_logging("info", &LoggingConfig::default())?;
//! tracing::info!("Application started");
//! # Ok(())
//! # }
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a bulk upload
///
/// # Example
///
/// ```no_run
/// use stockroom::log_upload_start;
///
/// log_upload_start!(3, 1_048_576u64);
/// ```
#[macro_export]
macro_rules! log_upload_start {
    ($files:expr, $bytes:expr) => {
        tracing::info!(files = $files, total_bytes = $bytes, "Starting bulk upload");
    };
}

/// Log the completion of a bulk upload
///
/// # Example
///
/// ```no_run
/// use stockroom::log_upload_complete;
/// use std::time::Duration;
///
/// log_upload_complete!(3, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_upload_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Bulk upload completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use stockroom::log_error_with_context;
/// use stockroom::domain::StockroomError;
///
/// let error = StockroomError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use stockroom::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 1000u128, "Connection refused");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms as u64,
            reason = %$reason,
            "Retrying request"
        );
    };
}
