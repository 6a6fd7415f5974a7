//! Request handlers, grouped the way the routes are.

pub mod accounts;
pub mod admin;
pub mod articles;
pub mod pages;

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use mime::Mime;

use domains::{AppError, ValidationErrors};

use crate::error::PageError;

/// An image part lifted out of a multipart submission.
pub(crate) struct UploadedImage {
    pub bytes: Bytes,
    pub mime: Mime,
}

/// Text fields plus at most one image from a multipart form.
///
/// Browsers send the file part even when no file was picked; an empty
/// filename or empty body means "no upload" and is dropped here.
pub(crate) struct MultipartForm {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, PageError> {
        let mut fields = HashMap::new();
        let mut image = None;
        while let Some(part) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = part.name().map(str::to_owned) else {
                continue;
            };
            if name == file_field {
                if part.file_name().is_none_or(str::is_empty) {
                    continue;
                }
                let mime = part
                    .content_type()
                    .and_then(|ct| ct.parse::<Mime>().ok())
                    .unwrap_or(mime::APPLICATION_OCTET_STREAM);
                let bytes = part.bytes().await.map_err(malformed)?;
                if !bytes.is_empty() {
                    image = Some(UploadedImage { bytes, mime });
                }
            } else {
                fields.insert(name, part.text().await.map_err(malformed)?);
            }
        }
        Ok(Self { fields, image })
    }

    /// The text field's value, empty when absent.
    pub fn field(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> PageError {
    tracing::debug!(error = %e, "rejecting malformed multipart body");
    PageError(AppError::Validation(ValidationErrors::single(
        "form",
        "the submitted form could not be read",
    )))
}
