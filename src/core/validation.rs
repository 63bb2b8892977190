//! Validation engine
//!
//! Pure checks for a selected file and for a product draft. Nothing here has
//! side effects, so the same functions screen files eagerly on selection and
//! gate the batch again at submission time.

use crate::config::UploadConfig;
use crate::domain::upload::parse_price;
use crate::domain::{Field, FieldError, ProductDraft, SelectedFile};

/// Message for files over the size limit
pub const FILE_TOO_LARGE: &str = "File size must be less than 5MB";
/// Message for files with a media type outside the allow-list
pub const FILE_TYPE_NOT_ALLOWED: &str = "Only JPEG, PNG, and WebP images are allowed";
/// Message for a blank product name
pub const NAME_REQUIRED: &str = "Product name is required";
/// Message for a blank price
pub const PRICE_REQUIRED: &str = "Price is required";
/// Message for a price that is not a positive number
pub const PRICE_NOT_POSITIVE: &str = "Price must be a positive number";

/// Limits applied to selected files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    /// Largest accepted size in bytes
    pub max_file_size: u64,

    /// Accepted media types, lowercase
    pub allowed_types: Vec<String>,
}

impl FileRules {
    /// Rules from the upload section of the configuration
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_types: config
                .allowed_types
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
        }
    }

    fn allows(&self, media_type: &str) -> bool {
        let media_type = media_type.trim().to_ascii_lowercase();
        self.allowed_types.iter().any(|t| *t == media_type)
    }
}

impl Default for FileRules {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

/// Validate one selected file
///
/// The size and type checks are independent; a file can fail both.
pub fn validate_file(file: &SelectedFile, rules: &FileRules) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if file.size > rules.max_file_size {
        errors.push(FieldError::new(Field::File, FILE_TOO_LARGE));
    }

    if !rules.allows(&file.media_type) {
        errors.push(FieldError::new(Field::File, FILE_TYPE_NOT_ALLOWED));
    }

    errors
}

/// Validate one product draft
///
/// Only `name` and `price` are checked. Description and category are
/// accepted as-is, including empty.
pub fn validate_product_form(draft: &ProductDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push(FieldError::new(Field::Name, NAME_REQUIRED));
    }

    if draft.price.trim().is_empty() {
        errors.push(FieldError::new(Field::Price, PRICE_REQUIRED));
    } else if parse_price(&draft.price).is_none() {
        errors.push(FieldError::new(Field::Price, PRICE_NOT_POSITIVE));
    }

    errors
}
