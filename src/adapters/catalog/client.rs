//! HTTP implementation of the product service boundary

use super::api::ProductApi;
use super::form::build_upload_form;
use crate::config::{ApiConfig, RetryConfig};
use crate::core::progress::ProgressReporter;
use crate::domain::{
    ApiError, ApiResponse, HealthStatus, PagedResponse, Product, ProductId, Result,
    SelectedFile, StockroomError, SubmissionRecord,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default size of streamed body chunks
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Product service client over `reqwest`
///
/// GET requests carry the read timeout and are retried with exponential
/// backoff on retryable errors. Uploads are sent once with no request
/// timeout; the submission coordinator owns their deadline.
///
/// # Example
///
/// ```no_run
/// use stockroom::adapters::catalog::HttpCatalogClient;
/// use stockroom::config::ApiConfig;
///
/// # fn example() -> stockroom::domain::Result<()> {
/// let client = HttpCatalogClient::new(&ApiConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub struct HttpCatalogClient {
    base_url: String,
    client: Client,
    read_timeout: Duration,
    retry: RetryConfig,
    chunk_size: usize,
}

impl HttpCatalogClient {
    /// Create a client from the `[api]` configuration
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("stockroom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StockroomError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.trimmed_base_url().to_string(),
            client,
            read_timeout: Duration::from_secs(config.timeout_seconds),
            retry: config.retry.clone(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Set the streamed chunk size for upload bodies
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `url` and decode the envelope, retrying retryable failures
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>> {
        self.retry_request(|| async {
            let resp = self
                .client
                .get(url)
                .timeout(self.read_timeout)
                .send()
                .await
                .map_err(transport_error)?;
            decode_envelope(resp).await
        })
        .await
    }

    /// Retry a request with exponential backoff
    ///
    /// Only errors for which [`ApiError::is_retryable`] holds are retried.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    let retryable = matches!(&e, StockroomError::Api(api) if api.is_retryable());
                    if !retryable || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay = self.retry.delay_for_attempt(attempt);
                    crate::log_retry_attempt!(attempt, max_retries, delay.as_millis(), e);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl ProductApi for HttpCatalogClient {
    async fn fetch_page(
        &self,
        page: usize,
        size: usize,
    ) -> Result<ApiResponse<PagedResponse<Product>>> {
        let url = self.url(&format!("/api/products?page={page}&size={size}"));
        tracing::debug!(url = %url, page, size, "Fetching product page");
        self.get_json(&url).await
    }

    async fn bulk_upload(
        &self,
        files: &[SelectedFile],
        records: &[SubmissionRecord],
        progress: ProgressReporter,
    ) -> Result<ApiResponse<Vec<Product>>> {
        let url = self.url("/api/products/bulk-upload");
        let upload = build_upload_form(files, records, self.chunk_size, progress)?;

        tracing::info!(
            url = %url,
            files = files.len(),
            payload_bytes = upload.payload_bytes,
            "Sending bulk upload"
        );

        let resp = self
            .client
            .post(&url)
            .multipart(upload.form)
            .send()
            .await
            .map_err(transport_error)?;
        decode_envelope(resp).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<ApiResponse<Product>> {
        let url = self.url(&format!("/api/products/{id}"));
        tracing::debug!(url = %url, product_id = %id, "Fetching product");
        self.get_json(&url).await
    }

    async fn health(&self) -> Result<ApiResponse<HealthStatus>> {
        let url = self.url("/api/health");
        self.get_json(&url).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(err: reqwest::Error) -> StockroomError {
    if err.is_timeout() {
        ApiError::Timeout(format!("Request timed out: {err}")).into()
    } else {
        ApiError::ConnectionFailed(err.to_string()).into()
    }
}

/// Turn a response into an envelope
///
/// Non-2xx is [`ApiError::HttpStatus`] whatever the body says; the body is
/// only logged. A 2xx body that is not an envelope is
/// [`ApiError::InvalidResponse`].
async fn decode_envelope<T: DeserializeOwned>(resp: Response) -> Result<ApiResponse<T>> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "Product service returned an error status");
        return Err(ApiError::HttpStatus {
            status: status.as_u16(),
        }
        .into());
    }

    let body = resp.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://catalog.local:8080/".to_string(),
            ..Default::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://catalog.local:8080");
        assert_eq!(
            client.url("/api/health"),
            "http://catalog.local:8080/api/health"
        );
    }

    #[test]
    fn test_chunk_size_is_at_least_one() {
        let client = HttpCatalogClient::new(&ApiConfig::default())
            .unwrap()
            .with_chunk_size(0);
        assert_eq!(client.chunk_size, 1);
    }
}
