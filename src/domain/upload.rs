//! Upload-side domain types
//!
//! A [`SelectedFile`] is paired with a user-editable [`ProductDraft`]. Drafts
//! keep the price as typed; it only becomes a number in
//! [`SubmissionRecord::from_draft`], after validation has passed.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A file chosen for upload
///
/// `size` and `media_type` are what the caller declares; validation trusts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name, sent as the multipart file name
    pub name: String,

    /// Declared media type, e.g. `image/png`
    pub media_type: String,

    /// Declared size in bytes
    pub size: u64,

    /// File contents
    pub data: Bytes,
}

impl SelectedFile {
    /// Create a file whose declared size is the length of `data`
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: data.len() as u64,
            data,
        }
    }

    /// Override the declared size
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Best-effort media type from a file extension
    pub fn media_type_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "svg" => "image/svg+xml",
            "tif" | "tiff" => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

/// Editable product metadata for one selected file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Product name
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Price exactly as entered
    #[serde(default)]
    pub price: String,

    /// Category
    #[serde(default)]
    pub category: String,
}

impl ProductDraft {
    /// Value of a draft field; `None` for [`Field::File`]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Description => Some(&self.description),
            Field::Price => Some(&self.price),
            Field::Category => Some(&self.category),
            Field::File => None,
        }
    }

    /// Mutable slot for a draft field; `None` for [`Field::File`]
    pub(crate) fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Description => Some(&mut self.description),
            Field::Price => Some(&mut self.price),
            Field::Category => Some(&mut self.category),
            Field::File => None,
        }
    }
}

/// Attribute an error can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// The selected file itself
    File,
    /// Product name
    Name,
    /// Description
    Description,
    /// Price
    Price,
    /// Category
    Category,
}

impl Field {
    /// Field name as shown to users and used in error maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::File => "file",
            Field::Name => "name",
            Field::Description => "description",
            Field::Price => "price",
            Field::Category => "category",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Field::File),
            "name" => Ok(Field::Name),
            "description" => Ok(Field::Description),
            "price" => Ok(Field::Price),
            "category" => Ok(Field::Category),
            other => Err(format!("Unknown field: {other}")),
        }
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending attribute
    pub field: Field,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Transport-ready form of a validated draft
///
/// Serialized into the `productData` multipart field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Product name
    pub name: String,

    /// Description
    pub description: String,

    /// Parsed positive price
    pub price: f64,

    /// Category
    pub category: String,
}

impl SubmissionRecord {
    /// Build a record from a draft, parsing the price
    ///
    /// Returns `None` unless the price parses to a finite value above zero.
    /// Text fields are sent as entered.
    pub fn from_draft(draft: &ProductDraft) -> Option<Self> {
        let price = parse_price(&draft.price)?;
        Some(Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price,
            category: draft.category.clone(),
        })
    }
}

/// Parse a user-entered price; `None` for blank, non-numeric, non-finite, or ≤ 0
///
/// Unsigned `0x`, `0o` and `0b` integer literals are accepted as well.
pub(crate) fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = match radix_literal(trimmed) {
        Some((digits, radix)) => u64::from_str_radix(digits, radix).ok()? as f64,
        None => trimmed.parse::<f64>().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn radix_literal(s: &str) -> Option<(&str, u32)> {
    let (prefix, digits) = (s.get(..2)?, s.get(2..)?);
    if digits.starts_with('+') {
        return None;
    }
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((digits, radix))
}
