//! Configuration management for Stockroom.
//!
//! # Overview
//!
//! Stockroom reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `STOCKROOM_*` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stockroom::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("stockroom.toml")?;
//! println!("Product service: {}", config.api.base_url);
//! println!("Max file size: {} bytes", config.upload.max_file_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ApiConfig`] - Product service URL, timeouts, retries
//! - [`UploadConfig`] - File size limit, accepted media types, streaming chunk size
//! - [`CatalogConfig`] - Page size
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080"
//! upload_timeout_seconds = 300
//!
//! [upload]
//! max_file_size = 5242880
//! allowed_types = ["image/jpeg", "image/png", "image/webp"]
//!
//! [catalog]
//! page_size = 6
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! export STOCKROOM_API_BASE_URL="https://catalog.example.com"
//! export STOCKROOM_UPLOAD_MAX_FILE_SIZE=10485760
//! export STOCKROOM_UPLOAD_ALLOWED_TYPES="image/jpeg,image/png"
//! export STOCKROOM_CATALOG_PAGE_SIZE=12
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApiConfig, ApplicationConfig, CatalogConfig, LoggingConfig, RetryConfig, StockroomConfig,
    UploadConfig,
};
