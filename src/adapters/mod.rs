//! External system integrations for Stockroom.
//!
//! - [`catalog`] - Product service over HTTP
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the workflow in
//! [`crate::core`] can be tested against in-memory implementations.
//!
//! ```rust,no_run
//! use stockroom::adapters::catalog::{HttpCatalogClient, ProductApi};
//! use stockroom::config::ApiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig {
//!     base_url: "https://catalog.example.com".to_string(),
//!     ..Default::default()
//! };
//!
//! let client = HttpCatalogClient::new(&config)?;
//! let health = client.health().await?;
//! println!("{:?}", health.data);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
