//! Catalog models shared with the product service
//!
//! Field names follow the service's camelCase JSON.

use super::errors::ApiError;
use super::ids::ProductId;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A committed product as returned by the product service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Free-form description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Unit price
    pub price: f64,

    /// Category label (may be empty)
    #[serde(default)]
    pub category: String,

    /// Absolute URL of the stored image
    #[serde(default)]
    pub image_url: String,

    /// ISO-8601 creation time, with or without an offset
    #[serde(default)]
    pub created_at: String,
}

impl Product {
    /// Price rendered for display, e.g. `$12.50`
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Calendar date of `created_at`, if it parses
    ///
    /// The service emits local date-times without an offset; RFC 3339 values
    /// are accepted too.
    pub fn created_date(&self) -> Option<NaiveDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(dt.date_naive());
        }
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.date())
    }
}

/// Response envelope used by every product service endpoint
///
/// `data` is absent (or null) on failure responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the server accepted the request
    pub success: bool,

    /// Human-readable outcome message
    #[serde(default)]
    pub message: String,

    /// Payload; a missing field reads as `None`
    pub data: Option<T>,

    /// Server timestamp
    #[serde(default)]
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// The payload of an accepted response
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the server message when `success`
    /// is false.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected(self.message))
        }
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    /// Items on this page
    pub content: Vec<T>,

    /// 0-based page index
    pub page: usize,

    /// Requested page size
    pub size: usize,

    /// Total items across all pages
    pub total_elements: u64,

    /// Number of pages
    pub total_pages: usize,

    /// Whether this is the first page
    pub first: bool,

    /// Whether this is the last page
    pub last: bool,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `UP` when healthy
    pub status: String,

    /// Service name
    #[serde(default)]
    pub service: String,

    /// Service version
    #[serde(default)]
    pub version: String,
}

impl HealthStatus {
    /// Whether the service reports itself as up
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("up")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product_json() -> &'static str {
        r#"{
            "id": "3c1d",
            "name": "Desk Lamp",
            "description": "Warm light",
            "price": 24.5,
            "category": "Lighting",
            "imageUrl": "http://localhost:8080/api/products/3c1d/image",
            "createdAt": "2025-03-14T09:26:53.589"
        }"#
    }

    #[test]
    fn test_product_deserializes_camel_case() {
        let product: Product = serde_json::from_str(sample_product_json()).unwrap();
        assert_eq!(product.id.as_str(), "3c1d");
        assert_eq!(
            product.image_url,
            "http://localhost:8080/api/products/3c1d/image"
        );
        assert_eq!(product.price, 24.5);
    }

    #[test]
    fn test_formatted_price() {
        let product: Product = serde_json::from_str(sample_product_json()).unwrap();
        assert_eq!(product.formatted_price(), "$24.50");
    }

    #[test]
    fn test_created_date_local_and_rfc3339() {
        let mut product: Product = serde_json::from_str(sample_product_json()).unwrap();
        assert_eq!(
            product.created_date(),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );

        product.created_at = "2025-03-14T23:10:00+02:00".to_string();
        assert_eq!(
            product.created_date(),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );

        product.created_at = "yesterday".to_string();
        assert!(product.created_date().is_none());
    }

    #[test]
    fn test_error_envelope_without_data() {
        let json = r#"{"success":false,"message":"Duplicate category","data":null,"timestamp":"2025-01-01T00:00:00"}"#;
        let resp: ApiResponse<Vec<Product>> = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message, "Duplicate category");
        assert!(resp.data.is_none());

        let resp: ApiResponse<Vec<Product>> =
            serde_json::from_str(r#"{"success":false,"message":"x"}"#).unwrap();
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_envelope_without_data_for_non_default_payloads() {
        let resp: ApiResponse<PagedResponse<Product>> =
            serde_json::from_str(r#"{"success":false,"message":"Catalog offline"}"#).unwrap();
        assert!(resp.data.is_none());

        let resp: ApiResponse<HealthStatus> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":null}"#).unwrap();
        assert!(resp.data.is_none());

        let resp: ApiResponse<Product> = serde_json::from_str(&format!(
            r#"{{"success":true,"data":{}}}"#,
            sample_product_json()
        ))
        .unwrap();
        assert_eq!(resp.data.unwrap().name, "Desk Lamp");
    }

    #[test]
    fn test_into_data_maps_rejection() {
        let accepted: ApiResponse<Vec<Product>> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":[]}"#).unwrap();
        assert_eq!(accepted.into_data().unwrap(), Some(Vec::new()));

        let rejected: ApiResponse<Vec<Product>> =
            serde_json::from_str(r#"{"success":false,"message":"Duplicate category"}"#).unwrap();
        let err = rejected.into_data().unwrap_err();
        assert!(matches!(&err, ApiError::Rejected(m) if m == "Duplicate category"));
        assert_eq!(err.to_string(), "Duplicate category");
    }

    #[test]
    fn test_paged_response_shape() {
        let json = format!(
            r#"{{"content":[{}],"page":0,"size":6,"totalElements":1,"totalPages":1,"first":true,"last":true}}"#,
            sample_product_json()
        );
        let page: PagedResponse<Product> = serde_json::from_str(&json).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.first && page.last);
    }

    #[test]
    fn test_health_status_is_up() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"UP","service":"Product Service","version":"1.0.0"}"#)
                .unwrap();
        assert!(health.is_up());
    }
}
