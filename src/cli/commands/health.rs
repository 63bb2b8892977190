//! Health command implementation

use super::{connect, exit_code_for, load_runtime_config, EXIT_CONNECTION, EXIT_OK};
use crate::adapters::catalog::ProductApi;
use clap::Args;

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {}

impl HealthArgs {
    /// Execute the health command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let client = match connect(&config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        println!("🔍 Checking product service at {}", client.base_url());

        match client.health().await {
            Ok(response) => match response.data {
                Some(health) if response.success && health.is_up() => {
                    println!("✅ {} {} is {}", health.service, health.version, health.status);
                    Ok(EXIT_OK)
                }
                Some(health) => {
                    println!("❌ Service reports status {}", health.status);
                    Ok(EXIT_CONNECTION)
                }
                None => {
                    println!("❌ {}", response.message);
                    Ok(EXIT_CONNECTION)
                }
            },
            Err(e) => {
                println!("❌ {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
