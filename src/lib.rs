// Stockroom - Bulk Product Catalog Uploader
// Copyright (c) 2025 Stockroom Contributors
// Licensed under the MIT License

//! # Stockroom - Bulk Product Catalog Uploader
//!
//! Stockroom pairs product images with metadata, validates them, and sends
//! the whole batch to a product service in a single multipart request.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Screening** selected images against size and media type limits
//! - **Editing** one product draft per image, with per-field errors
//! - **Submitting** all-or-nothing: one invalid draft blocks the batch
//! - **Tracking** upload progress through a `watch` channel
//! - **Browsing** the catalog one page at a time
//!
//! ## Architecture
//!
//! Stockroom follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (validation, session, submission, catalog)
//! - [`adapters`] - External integrations (product service over HTTP)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stockroom::adapters::catalog::HttpCatalogClient;
//! use stockroom::config::load_config_or_default;
//! use stockroom::core::notify::TracingNotifier;
//! use stockroom::core::session::UploadSession;
//! use stockroom::core::submit::SubmissionCoordinator;
//! use stockroom::core::validation::FileRules;
//! use stockroom::domain::{ProductDraft, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("stockroom.toml")?;
//!     let notifier = Arc::new(TracingNotifier);
//!
//!     let mut session = UploadSession::new();
//!     let image = SelectedFile::new("mug.jpg", "image/jpeg", std::fs::read("mug.jpg")?.into());
//!     session.select_files(vec![image], &FileRules::from_config(&config.upload), notifier.as_ref());
//!     session.fill_draft(0, ProductDraft {
//!         name: "Mug".to_string(),
//!         price: "8".to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     let api = Arc::new(HttpCatalogClient::new(&config.api)?);
//!     let coordinator = SubmissionCoordinator::new(api, notifier)
//!         .with_upload_timeout(config.api.upload_timeout());
//!     let outcome = coordinator.submit(&mut session).await;
//!
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], backed by [`domain::StockroomError`].
//! Submission never returns an error: every failure becomes a
//! [`core::submit::SubmitOutcome`] with the message the user was shown.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
