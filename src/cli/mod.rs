//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Stockroom using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Stockroom - bulk product catalog uploader
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(version, about, long_about = None)]
#[command(author = "Stockroom Contributors")]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "stockroom.toml", env = "STOCKROOM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STOCKROOM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload images with product metadata in one batch
    Upload(commands::upload::UploadArgs),

    /// List one page of the catalog
    List(commands::list::ListArgs),

    /// Show a single product
    Show(commands::show::ShowArgs),

    /// Check that the product service is up
    Health(commands::health::HealthArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Run the selected command and return its exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Upload(args) => args.execute(&self.config).await,
            Commands::List(args) => args.execute(&self.config).await,
            Commands::Show(args) => args.execute(&self.config).await,
            Commands::Health(args) => args.execute(&self.config).await,
            Commands::ValidateConfig(args) => args.execute(&self.config).await,
            Commands::Init(args) => args.execute().await,
        }
    }
}
