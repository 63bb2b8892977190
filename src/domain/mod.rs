//! Domain models and types for Stockroom.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ProductId`])
//! - **Catalog models** ([`Product`], [`ApiResponse`], [`PagedResponse`])
//! - **Upload models** ([`SelectedFile`], [`ProductDraft`], [`SubmissionRecord`])
//! - **Error types** ([`StockroomError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StockroomError>`]:
//!
//! ```rust
//! use stockroom::domain::{ProductId, Result, StockroomError};
//!
//! fn parse(id: &str) -> Result<ProductId> {
//!     ProductId::new(id).map_err(StockroomError::Validation)
//! }
//!
//! assert!(parse("p-1").is_ok());
//! assert!(parse("").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod product;
pub mod result;
pub mod upload;

// Re-export commonly used types for convenience
pub use errors::{ApiError, StockroomError};
pub use ids::ProductId;
pub use product::{ApiResponse, HealthStatus, PagedResponse, Product};
pub use result::Result;
pub use upload::{Field, FieldError, ProductDraft, SelectedFile, SubmissionRecord};
