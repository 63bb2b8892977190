//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "stockroom.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

/// Sample configuration with every setting at its default
pub const SAMPLE_CONFIG: &str = r#"# Stockroom Configuration File
#
# Every value below is the default. ${VAR} references are replaced with
# environment variables, and STOCKROOM_<SECTION>_<KEY> variables override
# individual settings (e.g. STOCKROOM_API_BASE_URL).

[application]
# trace, debug, info, warn, error
log_level = "info"

[api]
# Product service root; requests go to {base_url}/api/...
base_url = "http://localhost:8080"
# Connect and read timeout for catalog requests
timeout_seconds = 30
# Deadline for one bulk upload
upload_timeout_seconds = 300

[api.retry]
# Catalog reads only; uploads are never retried
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 8000
backoff_multiplier = 2.0

[upload]
# 5 MB
max_file_size = 5242880
allowed_types = ["image/jpeg", "image/png", "image/webp"]
chunk_size_bytes = 65536

[catalog]
page_size = 6

[logging]
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
# Rotated files kept
local_max_files = 7
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set api.base_url in {}", self.output);
                println!("  2. Check it: stockroom validate-config");
                println!("  3. Upload: stockroom upload --manifest products.toml");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
