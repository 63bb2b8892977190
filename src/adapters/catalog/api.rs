//! Product service boundary
//!
//! [`ProductApi`] is the seam between the upload/catalog workflow and the
//! remote product service. The HTTP implementation lives in
//! [`super::client`]; tests substitute their own.

use crate::core::progress::ProgressReporter;
use crate::domain::{
    ApiResponse, HealthStatus, PagedResponse, Product, ProductId, Result, SelectedFile,
    SubmissionRecord,
};
use async_trait::async_trait;

/// Operations offered by the product service
///
/// Implementations return the service envelope as-is. A well-formed
/// `success: false` response is `Ok`; deciding what it means is the caller's
/// job. Transport problems (unreachable server, non-2xx status, unparsable
/// body) are `Err(StockroomError::Api(..))`.
///
/// # Example
///
/// ```no_run
/// use stockroom::adapters::catalog::{HttpCatalogClient, ProductApi};
/// use stockroom::config::ApiConfig;
///
/// # async fn example() -> stockroom::domain::Result<()> {
/// let client = HttpCatalogClient::new(&ApiConfig::default())?;
/// let page = client.fetch_page(0, 6).await?;
/// if let Some(page) = page.data {
///     println!("{} products", page.total_elements);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch one page of products (`page` is 0-based)
    async fn fetch_page(&self, page: usize, size: usize)
        -> Result<ApiResponse<PagedResponse<Product>>>;

    /// Upload every file with its record in one multipart request
    ///
    /// `files` and `records` are paired by position. Byte progress is
    /// published to `progress` while the body is sent. Never retried.
    async fn bulk_upload(
        &self,
        files: &[SelectedFile],
        records: &[SubmissionRecord],
        progress: ProgressReporter,
    ) -> Result<ApiResponse<Vec<Product>>>;

    /// Fetch a single product
    async fn get_product(&self, id: &ProductId) -> Result<ApiResponse<Product>>;

    /// Service health
    async fn health(&self) -> Result<ApiResponse<HealthStatus>>;

    /// Base URL requests are sent to
    fn base_url(&self) -> &str;
}
