//! Multipart helpers for the upload handler

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use galleria_core::AppError;

/// Field names accepted for the uploaded file.
pub const FILE_FIELDS: [&str; 2] = ["image", "file"];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File extracted from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: String,
}

/// Map a multipart read failure. A body over the transport limit is a 413;
/// anything else is a malformed request.
fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            size: max_size as u64 + 1,
            max: max_size as u64,
        }
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Extract the single file field (`image` or `file`) from a multipart form.
/// Other fields are drained and ignored; a second file field is rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<UploadedFile, AppError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if !FILE_FIELDS.contains(&field_name.as_str()) {
            continue;
        }

        if uploaded.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'image'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_size))?;

        uploaded = Some(UploadedFile {
            data: data.to_vec(),
            file_name,
            content_type,
        });
    }

    uploaded.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
