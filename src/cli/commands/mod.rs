//! CLI command implementations
//!
//! Every command returns a process exit code:
//! 0 success, 1 upload or validation failure, 2 configuration error,
//! 4 connection error, 5 fatal error.

pub mod health;
pub mod init;
pub mod list;
pub mod show;
pub mod upload;
pub mod validate;

use crate::adapters::catalog::HttpCatalogClient;
use crate::config::{load_config_or_default, StockroomConfig};
use crate::domain::{ApiError, StockroomError};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for a rejected or invalid upload
pub const EXIT_FAILED: i32 = 1;
/// Exit code for configuration problems
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the product service cannot be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;

/// Exit code for an error surfaced by a command
pub fn exit_code_for(error: &StockroomError) -> i32 {
    match error {
        StockroomError::Configuration(_) => EXIT_CONFIG,
        StockroomError::Api(ApiError::ConnectionFailed(_) | ApiError::Timeout(_)) => {
            EXIT_CONNECTION
        }
        StockroomError::Api(_) | StockroomError::Validation(_) => EXIT_FAILED,
        _ => EXIT_FATAL,
    }
}

/// Load configuration, printing the error and returning an exit code on failure
pub(crate) fn load_runtime_config(config_path: &str) -> Result<StockroomConfig, i32> {
    load_config_or_default(config_path).map_err(|e| {
        println!("❌ Failed to load configuration");
        println!("   Error: {e}");
        EXIT_CONFIG
    })
}

/// Build the HTTP client, printing the error and returning an exit code on failure
pub(crate) fn connect(config: &StockroomConfig) -> Result<HttpCatalogClient, i32> {
    HttpCatalogClient::new(&config.api)
        .map(|client| client.with_chunk_size(config.upload.chunk_size_bytes))
        .map_err(|e| {
            println!("❌ Failed to create product service client");
            println!("   Error: {e}");
            exit_code_for(&e)
        })
}
