//! Upload pipeline
//!
//! cover extraction -> object upload -> public URL -> metadata insert.
//! Each step aborts the pipeline on failure. Nothing is retried and a stored
//! object is not removed when the metadata insert fails afterwards.

use std::sync::Arc;

use uuid::Uuid;

use crate::cover::extract_cover;
use crate::gateway::Gateway;
use crate::library::{NewBook, PLACEHOLDER_COVER};

use super::types::{SelectedFile, UploadError, UploadOutcome, UploadRequest};

#[derive(Clone)]
pub struct UploadPipeline {
    gateway: Arc<dyn Gateway>,
}

impl UploadPipeline {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn run(&self, request: UploadRequest) -> Result<UploadOutcome, UploadError> {
        let file = request.file.ok_or(UploadError::NoFileSelected)?;
        let author = request.author.trim().to_string();
        if author.is_empty() {
            return Err(UploadError::MissingAuthor);
        }

        let media_type = file.media_type();
        let cover_url = cover_for(&file).await;

        let storage_name = storage_name(&file);
        tracing::info!(
            file_name = %file.name,
            storage_name = %storage_name,
            size = file.data.len(),
            media_type = %media_type,
            "Uploading book"
        );

        let SelectedFile { name, data, .. } = file;
        self.gateway
            .upload(&storage_name, data, &media_type)
            .await
            .map_err(|e| UploadError::StorageFailed(e.message))?;

        let file_url = self
            .gateway
            .public_url(&storage_name)
            .filter(|url| !url.is_empty())
            .ok_or(UploadError::NoPublicUrl)?;

        let new_book = NewBook {
            title: name,
            author,
            description: None,
            file_url: Some(file_url.clone()),
            cover_url: Some(cover_url),
        };

        let book = self
            .gateway
            .insert(vec![new_book])
            .await
            .map_err(|e| UploadError::InsertFailed(e.message))?
            .into_iter()
            .next()
            .ok_or_else(|| UploadError::InsertFailed("no row returned".to_string()))?;

        tracing::info!(
            id = ?book.id,
            title = %book.title,
            file_url = %file_url,
            "Book uploaded"
        );

        Ok(UploadOutcome {
            book,
            file_url,
            storage_name,
        })
    }
}

/// Page-one render for PDFs, the placeholder for everything else
async fn cover_for(file: &SelectedFile) -> String {
    if !file.is_pdf() {
        return PLACEHOLDER_COVER.to_string();
    }
    extract_cover(file.data.clone())
        .await
        .unwrap_or_else(|| PLACEHOLDER_COVER.to_string())
}

/// Random object name keeping the original extension
fn storage_name(file: &SelectedFile) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match file.extension() {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::tests::blank_pdf;
    use crate::gateway::MemoryGateway;

    fn request(file: Option<SelectedFile>) -> UploadRequest {
        UploadRequest {
            author: "Ada".to_string(),
            file,
        }
    }

    fn pipeline() -> (Arc<MemoryGateway>, UploadPipeline) {
        let gateway = Arc::new(MemoryGateway::new());
        (gateway.clone(), UploadPipeline::new(gateway))
    }

    #[tokio::test]
    async fn test_pdf_upload_embeds_rendered_cover() {
        let (gateway, pipeline) = pipeline();
        let file = SelectedFile::new("Notes.pdf", Some("application/pdf"), blank_pdf());

        let outcome = pipeline.run(request(Some(file))).await.unwrap();

        let cover = outcome.book.cover_url.clone().unwrap();
        assert!(cover.starts_with("data:image/jpeg;base64,"));
        assert_eq!(outcome.book.file_url, outcome.file_url);
        assert_eq!(
            Some(outcome.file_url.clone()),
            gateway.public_url(&outcome.storage_name)
        );
        assert_eq!(outcome.book.title, "Notes.pdf");
        assert_eq!(outcome.book.author, "Ada");
        assert_eq!(outcome.book.id.as_deref(), Some("1"));
        assert_eq!(gateway.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_falls_back_to_placeholder() {
        let (_gateway, pipeline) = pipeline();
        let file = SelectedFile::new("broken.pdf", Some("application/pdf"), b"garbage".to_vec());

        let outcome = pipeline.run(request(Some(file))).await.unwrap();
        assert_eq!(outcome.book.cover_url.as_deref(), Some(PLACEHOLDER_COVER));
    }

    #[tokio::test]
    async fn test_non_pdf_uses_placeholder_cover() {
        let (gateway, pipeline) = pipeline();
        let file = SelectedFile::new("novel.epub", Some("application/epub+zip"), vec![1, 2, 3]);

        let outcome = pipeline.run(request(Some(file))).await.unwrap();

        assert_eq!(outcome.book.cover_url.as_deref(), Some(PLACEHOLDER_COVER));
        assert!(outcome.storage_name.ends_with(".epub"));
        let (content_type, data) = gateway.object(&outcome.storage_name).await.unwrap();
        assert_eq!(content_type, "application/epub+zip");
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_file_rejected_before_gateway() {
        let (gateway, pipeline) = pipeline();

        let err = pipeline.run(request(None)).await.unwrap_err();

        assert_eq!(err, UploadError::NoFileSelected);
        assert_eq!(gateway.object_count().await, 0);
        assert!(gateway.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_author_rejected() {
        let (gateway, pipeline) = pipeline();
        let file = SelectedFile::new("a.pdf", None, vec![]);

        let err = pipeline
            .run(UploadRequest {
                author: "   ".to_string(),
                file: Some(file),
            })
            .await
            .unwrap_err();

        assert_eq!(err, UploadError::MissingAuthor);
        assert_eq!(gateway.object_count().await, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_skips_insert() {
        let (gateway, pipeline) = pipeline();
        gateway.fail_uploads("Bucket not found").await;
        let file = SelectedFile::new("a.epub", None, vec![1]);

        let err = pipeline.run(request(Some(file))).await.unwrap_err();

        assert!(err.to_string().contains("Bucket not found"));
        assert_eq!(err.to_string(), "File upload failed: Bucket not found");
        assert!(gateway.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_public_url() {
        let (gateway, pipeline) = pipeline();
        gateway.withhold_public_urls().await;
        let file = SelectedFile::new("a.epub", None, vec![1]);

        let err = pipeline.run(request(Some(file))).await.unwrap_err();

        assert_eq!(err, UploadError::NoPublicUrl);
        assert!(gateway.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_leaves_stored_object() {
        let (gateway, pipeline) = pipeline();
        gateway.fail_inserts("new row violates row-level security policy").await;
        let file = SelectedFile::new("a.epub", None, vec![1]);

        let err = pipeline.run(request(Some(file))).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Database insertion failed: new row violates row-level security policy"
        );
        assert_eq!(gateway.object_count().await, 1);
    }

    #[test]
    fn test_storage_names_are_unique_and_keep_extension() {
        let file = SelectedFile::new("Report.Final.pdf", None, vec![]);
        let a = storage_name(&file);
        let b = storage_name(&file);

        assert_ne!(a, b);
        assert!(a.ends_with(".pdf"));
        assert_eq!(a.len(), 32 + 4);

        let bare = SelectedFile::new("README", None, vec![]);
        assert_eq!(storage_name(&bare).len(), 32);
    }
}
