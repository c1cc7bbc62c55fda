//! Multipart upload form parsing
//!
//! Shared by the HTML upload view and the JSON API. Accepts the author under
//! `name` or `author` and the book under `file` or `book`.

use axum::extract::Multipart;

use crate::error::{AppError, Result};
use crate::upload::{SelectedFile, UploadRequest};

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadRequest> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read upload: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "name" | "author" => {
                request.author = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read name: {}", e)))?;
            }
            "file" | "book" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read file data: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                tracing::debug!(
                    file_name = %file_name,
                    content_type = ?content_type,
                    size = data.len(),
                    "Received upload field"
                );

                // Browsers send an empty part when no file was chosen
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                request.file = Some(SelectedFile {
                    name: file_name,
                    content_type,
                    data,
                });
            }
            other => {
                tracing::debug!("Ignoring multipart field '{}'", other);
            }
        }
    }

    Ok(request)
}
