//! Core business logic for Stockroom.
//!
//! # Modules
//!
//! - [`validation`] - Pure checks for selected files and product drafts
//! - [`session`] - Files paired with their drafts and errors
//! - [`submit`] - All-or-nothing batch submission
//! - [`progress`] - Byte progress published as a percentage
//! - [`catalog`] - Paged catalog browsing
//! - [`notify`] - Sinks for user-facing notifications
//!
//! # Upload Workflow
//!
//! 1. **Select**: files are screened against size and type limits
//! 2. **Edit**: each file gets a draft (name, description, price, category)
//! 3. **Submit**: every draft is re-validated; one invalid draft blocks the batch
//! 4. **Upload**: all files and records go out in one multipart request
//! 5. **Report**: one notification per outcome; the catalog refreshes on success
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stockroom::adapters::catalog::HttpCatalogClient;
//! use stockroom::config::load_config_or_default;
//! use stockroom::core::notify::ConsoleNotifier;
//! use stockroom::core::session::UploadSession;
//! use stockroom::core::submit::SubmissionCoordinator;
//! use stockroom::core::validation::FileRules;
//! use stockroom::domain::{Field, SelectedFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("stockroom.toml")?;
//! let api = Arc::new(HttpCatalogClient::new(&config.api)?);
//! let notifier = Arc::new(ConsoleNotifier);
//!
//! let mut session = UploadSession::new();
//! let image = SelectedFile::new("lamp.png", "image/png", std::fs::read("lamp.png")?.into());
//! session.select_files(vec![image], &FileRules::from_config(&config.upload), notifier.as_ref());
//! session.update_draft_field(0, Field::Name, "Desk lamp")?;
//! session.update_draft_field(0, Field::Price, "24.50")?;
//!
//! let coordinator = SubmissionCoordinator::new(api, notifier);
//! let outcome = coordinator.submit(&mut session).await;
//! println!("accepted: {}", outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod notify;
pub mod progress;
pub mod session;
pub mod submit;
pub mod validation;
