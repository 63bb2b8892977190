//! Domain identifier types with validation
//!
//! Newtype wrappers so product identifiers can't be confused with other strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product identifier newtype wrapper
///
/// Assigned by the product service on creation. The client treats it as opaque.
///
/// # Examples
///
/// ```
/// use stockroom::domain::ids::ProductId;
/// use std::str::FromStr;
///
/// let id = ProductId::from_str("5f0c9a6e-8a47-4c1b-9b53-0e7e2a3c1d11").unwrap();
/// assert_eq!(id.as_str(), "5f0c9a6e-8a47-4c1b-9b53-0e7e2a3c1d11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new ProductId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ProductId)` if the ID is non-blank and contains no path
    /// separators, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Product ID cannot be empty".to_string());
        }
        if id.contains('/') || id.contains('?') || id.contains('#') {
            return Err(format!("Product ID contains reserved characters: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the product ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
