//! Product service adapter
//!
//! This module provides the integration with the product service: the
//! [`ProductApi`] boundary trait, its `reqwest` implementation, and the
//! streamed multipart body used for bulk uploads.

pub mod api;
pub mod client;
pub mod form;

pub use api::ProductApi;
pub use client::{HttpCatalogClient, DEFAULT_CHUNK_SIZE};
pub use form::{build_upload_form, UploadForm, IMAGES_FIELD, PRODUCT_DATA_FIELD};
