//! Configuration schema types
//!
//! This module defines the configuration structure for Stockroom. Every
//! section has defaults, so an empty file (or no file at all) is a valid
//! configuration pointing at a local product service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main Stockroom configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockroomConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Product service connection
    #[serde(default)]
    pub api: ApiConfig,

    /// File screening rules and upload streaming
    #[serde(default)]
    pub upload: UploadConfig,

    /// Catalog browsing
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StockroomConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.upload.validate()?;
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry configuration for read requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 disables retries)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("api.retry.max_retries must be >= 1".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("api.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("api.retry.initial_delay_ms must be <= api.retry.max_delay_ms".to_string());
        }
        Ok(())
    }

    /// Delay before the retry that follows attempt number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay_ms = (self.initial_delay_ms as f64 * factor) as u64;
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Product service connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the product service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for read requests in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Deadline for a whole bulk upload in seconds
    #[serde(default = "default_upload_timeout_seconds")]
    pub upload_timeout_seconds: u64,

    /// Retry settings for read requests (uploads are never retried)
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "api.base_url must use http or https, got '{}'",
                parsed.scheme()
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }
        if self.upload_timeout_seconds == 0 {
            return Err("api.upload_timeout_seconds must be > 0".to_string());
        }
        self.retry.validate()?;
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Upload deadline as a [`Duration`]
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            upload_timeout_seconds: default_upload_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Upload configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted media types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,

    /// Size of the chunks file bodies are streamed in; progress is reported per chunk
    #[serde(default = "default_chunk_size_bytes")]
    pub chunk_size_bytes: usize,
}

impl UploadConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_file_size == 0 {
            return Err("upload.max_file_size must be > 0".to_string());
        }
        if self.allowed_types.is_empty() {
            return Err("upload.allowed_types must not be empty".to_string());
        }
        for media_type in &self.allowed_types {
            let mut parts = media_type.split('/');
            let valid = matches!(
                (parts.next(), parts.next(), parts.next()),
                (Some(t), Some(s), None) if !t.is_empty() && !s.is_empty()
            );
            if !valid {
                return Err(format!(
                    "upload.allowed_types entry '{media_type}' is not a type/subtype media type"
                ));
            }
        }
        if self.chunk_size_bytes == 0 {
            return Err("upload.chunk_size_bytes must be > 0".to_string());
        }
        Ok(())
    }

    /// Parse a delimited media type list (`image/jpeg,image/png`)
    ///
    /// Blank entries are dropped.
    pub fn parse_allowed_types(list: &str) -> Vec<String> {
        list.split([',', ';'])
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
            chunk_size_bytes: default_chunk_size_bytes(),
        }
    }
}

/// Catalog browsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Products per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || self.page_size > 100 {
            return Err(format!(
                "catalog.page_size must be between 1 and 100, got {}",
                self.page_size
            ));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Rotated log files to keep; older ones are deleted on rotation
    #[serde(default = "default_local_max_files")]
    pub local_max_files: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_files == 0 {
            return Err("logging.local_max_files must be > 0".to_string());
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local logging is enabled".to_string());
        }

        Ok(())
    }

    /// Console-only logging, used by the CLI before a config file is read
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_files: default_local_max_files(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_upload_timeout_seconds() -> u64 {
    300
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_chunk_size_bytes() -> usize {
    64 * 1024
}

fn default_page_size() -> usize {
    6
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_files() -> usize {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = StockroomConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.upload.max_file_size, 5_242_880);
        assert_eq!(
            config.upload.allowed_types,
            vec!["image/jpeg", "image/png", "image/webp"]
        );
        assert_eq!(config.catalog.page_size, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: StockroomConfig = toml::from_str("").unwrap();
        assert_eq!(config, StockroomConfig::default());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_config_validation() {
        let mut config = ApiConfig::default();
        assert!(config.validate().is_ok());

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://files.example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("http or https"));

        config.base_url = "https://catalog.example.com/".to_string();
        assert_eq!(config.trimmed_base_url(), "https://catalog.example.com");

        config.upload_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 3000,
            backoff_multiplier: 2.0,
        };
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(1000));
        assert_eq!(retry.delay_for_attempt(3), Duration::from_millis(2000));
        assert_eq!(retry.delay_for_attempt(4), Duration::from_millis(3000));
    }

    #[test]
    fn test_upload_config_validation() {
        let mut config = UploadConfig::default();
        assert!(config.validate().is_ok());

        config.allowed_types = vec![];
        assert!(config.validate().is_err());

        config.allowed_types = vec!["jpeg".to_string()];
        assert!(config.validate().is_err());

        config.allowed_types = vec!["image/".to_string()];
        assert!(config.validate().is_err());

        config.allowed_types = vec!["image/gif".to_string()];
        config.max_file_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_allowed_types() {
        assert_eq!(
            UploadConfig::parse_allowed_types("image/jpeg, IMAGE/PNG,,image/webp "),
            vec!["image/jpeg", "image/png", "image/webp"]
        );
        assert!(UploadConfig::parse_allowed_types(" , ").is_empty());
    }

    #[test]
    fn test_catalog_page_size_bounds() {
        let mut config = CatalogConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 101;
        assert!(config.validate().is_err());
        config.page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_retention() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.local_max_files, 7);

        config.local_max_files = 0;
        assert_eq!(
            config.validate().unwrap_err(),
            "logging.local_max_files must be > 0"
        );

        let parsed: LoggingConfig = toml::from_str("local_max_files = 3").unwrap();
        assert_eq!(parsed.local_max_files, 3);
        assert_eq!(parsed.local_rotation, "daily");
    }
}
