//! Show command implementation

use super::{connect, exit_code_for, load_runtime_config, EXIT_FAILED, EXIT_OK};
use crate::adapters::catalog::ProductApi;
use crate::domain::ProductId;
use clap::Args;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Product ID
    pub id: String,
}

impl ShowArgs {
    /// Execute the show command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let id = match ProductId::new(self.id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_FAILED);
            }
        };

        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let client = match connect(&config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let response = match client.get_product(&id).await {
            Ok(r) => r,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to fetch product");
                println!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match response.data {
            Some(product) if response.success => {
                println!("🛍️  {}", product.name);
                println!("   ID:          {}", product.id);
                println!("   Price:       {}", product.formatted_price());
                if !product.category.is_empty() {
                    println!("   Category:    {}", product.category);
                }
                if !product.description.is_empty() {
                    println!("   Description: {}", product.description);
                }
                if !product.image_url.is_empty() {
                    println!("   Image:       {}", product.image_url);
                }
                if let Some(date) = product.created_date() {
                    println!("   Created:     {}", date.format("%Y-%m-%d"));
                }
                Ok(EXIT_OK)
            }
            _ => {
                println!("❌ {}", response.message);
                Ok(EXIT_FAILED)
            }
        }
    }
}
