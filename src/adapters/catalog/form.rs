//! Multipart body for bulk uploads
//!
//! Each part is streamed in fixed-size chunks; every chunk handed to the
//! transport advances a shared [`ByteCounter`], which is where upload
//! progress comes from.

use crate::core::progress::{ByteCounter, ProgressReporter};
use crate::domain::{ApiError, Result, SelectedFile, SubmissionRecord};
use bytes::Bytes;
use futures::StreamExt as _;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::convert::Infallible;
use std::sync::Arc;

/// Field name repeated once per image
pub const IMAGES_FIELD: &str = "images";

/// Field carrying the JSON array of records
pub const PRODUCT_DATA_FIELD: &str = "productData";

/// A built form and the number of payload bytes it will report
pub struct UploadForm {
    /// Multipart form ready to attach to a request
    pub form: Form,

    /// Sum of file sizes plus the `productData` JSON length
    pub payload_bytes: u64,
}

/// Build the bulk-upload form
///
/// Images are added in order under [`IMAGES_FIELD`], followed by the records
/// serialized as one JSON array under [`PRODUCT_DATA_FIELD`].
pub fn build_upload_form(
    files: &[SelectedFile],
    records: &[SubmissionRecord],
    chunk_size: usize,
    progress: ProgressReporter,
) -> Result<UploadForm> {
    let product_data = Bytes::from(serde_json::to_vec(records)?);
    let payload_bytes = files
        .iter()
        .map(|f| f.data.len() as u64)
        .sum::<u64>()
        + product_data.len() as u64;

    let counter = Arc::new(ByteCounter::new(payload_bytes, progress));
    let mut form = Form::new();

    for file in files {
        let part = counted_part(file.data.clone(), chunk_size, &counter)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| {
                ApiError::InvalidRequest(format!(
                    "Invalid media type '{}' for {}: {e}",
                    file.media_type, file.name
                ))
            })?;
        form = form.part(IMAGES_FIELD, part);
    }

    form = form.part(
        PRODUCT_DATA_FIELD,
        counted_part(product_data, chunk_size, &counter),
    );

    Ok(UploadForm {
        form,
        payload_bytes,
    })
}

/// Split `data` into chunks of at most `chunk_size` bytes
///
/// Slices share the underlying buffer. Empty input yields no chunks.
pub(crate) fn chunk(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect()
}

fn counted_part(data: Bytes, chunk_size: usize, counter: &Arc<ByteCounter>) -> Part {
    let length = data.len() as u64;
    let counter = Arc::clone(counter);
    let stream = futures::stream::iter(chunk(&data, chunk_size)).map(move |piece| {
        counter.advance(piece.len() as u64);
        Ok::<Bytes, Infallible>(piece)
    });
    Part::stream_with_length(Body::wrap_stream(stream), length)
}
