//! Upload types

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::library::Book;

/// A file chosen in the upload form
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Original file name, becomes the book title
    pub name: String,
    /// Media type reported by the client, if any
    pub content_type: Option<String>,
    /// Shared buffer; cover rendering and the storage upload both hold it
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            data: Bytes::from(data),
        }
    }

    /// Media type, guessed from the extension when the client sent none
    pub fn media_type(&self) -> String {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
            _ => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type() == "application/pdf"
    }

    /// Extension after the last dot, if the name has one
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// Upload form input
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Uploader's display name, stored as the author
    pub author: String,
    pub file: Option<SelectedFile>,
}

/// Result of a completed upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Stored record, including its gateway-assigned id
    pub book: Book,
    /// Public URL of the stored file, also encoded as a QR code in the view
    pub file_url: String,
    /// Object name the file was stored under
    pub storage_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Author name is required")]
    MissingAuthor,

    #[error("File upload failed: {0}")]
    StorageFailed(String),

    #[error("Failed to get public URL")]
    NoPublicUrl,

    #[error("Database insertion failed: {0}")]
    InsertFailed(String),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::NoFileSelected | UploadError::MissingAuthor => StatusCode::BAD_REQUEST,
            UploadError::StorageFailed(_)
            | UploadError::NoPublicUrl
            | UploadError::InsertFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NoFileSelected => "NO_FILE_SELECTED",
            UploadError::MissingAuthor => "MISSING_AUTHOR",
            UploadError::StorageFailed(_) => "STORAGE_ERROR",
            UploadError::NoPublicUrl => "NO_PUBLIC_URL",
            UploadError::InsertFailed(_) => "DATABASE_ERROR",
        }
    }
}
