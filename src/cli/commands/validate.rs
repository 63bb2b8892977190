//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Stockroom configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Unlike the other commands, the file must exist.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Product Service: {}", config.api.base_url);
        println!("  Request Timeout: {}s", config.api.timeout_seconds);
        println!("  Upload Timeout: {}s", config.api.upload_timeout_seconds);
        println!("  Max Retries: {}", config.api.retry.max_retries);
        println!("  Max File Size: {} bytes", config.upload.max_file_size);
        println!("  Allowed Types: {}", config.upload.allowed_types.join(", "));
        println!("  Page Size: {}", config.catalog.page_size);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let code = ValidateArgs {}
            .execute("/definitely/not/here/stockroom.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\npage_size = 0").unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
