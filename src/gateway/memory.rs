//! In-memory gateway
//!
//! Keeps rows and objects in process. Used by tests and by the `memory`
//! gateway mode for local development without a hosted backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::RwLock;

use crate::library::{Book, NewBook};

use super::{Gateway, GatewayError, GatewayResult};

const PUBLIC_BASE: &str = "http://localhost/storage/v1/object/public/ebooks";

/// In-process stand-in for the hosted backend
#[derive(Default)]
pub struct MemoryGateway {
    rows: RwLock<Vec<Book>>,
    inserted: RwLock<Vec<NewBook>>,
    objects: RwLock<HashMap<String, (String, Bytes)>>,
    next_id: AtomicU64,
    failures: RwLock<Failures>,
}

#[derive(Default)]
struct Failures {
    upload: Option<String>,
    insert: Option<String>,
    no_public_url: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the table with stored rows
    pub async fn with_rows(rows: Vec<NewBook>) -> Self {
        let gateway = Self::new();
        // Infallible unless a failure was injected
        let _ = gateway.insert(rows).await;
        gateway
    }

    /// Make every following upload fail with `message`
    pub async fn fail_uploads(&self, message: impl Into<String>) {
        self.failures.write().await.upload = Some(message.into());
    }

    /// Make every following insert fail with `message`
    pub async fn fail_inserts(&self, message: impl Into<String>) {
        self.failures.write().await.insert = Some(message.into());
    }

    /// Stop resolving public URLs
    pub async fn withhold_public_urls(&self) {
        self.failures.write().await.no_public_url = true;
    }

    /// Snapshot of the stored rows
    pub async fn rows(&self) -> Vec<Book> {
        self.rows.read().await.clone()
    }

    /// Insert payloads exactly as they were sent, before any row decoding
    pub async fn inserted(&self) -> Vec<NewBook> {
        self.inserted.read().await.clone()
    }

    /// Content type and bytes of a stored object
    pub async fn object(&self, name: &str) -> Option<(String, Vec<u8>)> {
        self.objects
            .read()
            .await
            .get(name)
            .map(|(content_type, data)| (content_type.clone(), data.to_vec()))
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select_all(&self) -> GatewayResult<Vec<Book>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, books: Vec<NewBook>) -> GatewayResult<Vec<Book>> {
        if let Some(message) = self.failures.read().await.insert.clone() {
            return Err(GatewayError::new(message));
        }

        self.inserted.write().await.extend(books.iter().cloned());

        let stored: Vec<Book> = books
            .into_iter()
            .map(|book| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                book.into_book(id.to_string())
            })
            .collect();

        self.rows.write().await.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> GatewayResult<()> {
        if let Some(message) = self.failures.read().await.upload.clone() {
            return Err(GatewayError::new(message));
        }

        let mut objects = self.objects.write().await;
        if objects.contains_key(name) {
            return Err(GatewayError::new("The resource already exists"));
        }
        objects.insert(name.to_string(), (content_type.to_string(), data));
        Ok(())
    }

    fn public_url(&self, name: &str) -> Option<String> {
        let withheld = self
            .failures
            .try_read()
            .map(|f| f.no_public_url)
            .unwrap_or(false);
        if withheld || name.is_empty() {
            return None;
        }
        Some(format!("{}/{}", PUBLIC_BASE, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            description: None,
            file_url: Some(format!("https://files.example.com/{}", title)),
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_in_order() {
        let gateway = MemoryGateway::new();
        let stored = gateway
            .insert(vec![new_book("a"), new_book("b")])
            .await
            .unwrap();

        assert_eq!(stored[0].id.as_deref(), Some("1"));
        assert_eq!(stored[1].id.as_deref(), Some("2"));
        assert_eq!(gateway.select_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_injected_insert_failure() {
        let gateway = MemoryGateway::new();
        gateway.fail_inserts("permission denied").await;

        let err = gateway.insert(vec![new_book("a")]).await.unwrap_err();
        assert_eq!(err.message, "permission denied");
        assert!(gateway.rows().await.is_empty());
        assert!(gateway.inserted().await.is_empty());
    }

    #[tokio::test]
    async fn test_inserted_keeps_null_apart_from_empty() {
        let gateway = MemoryGateway::new();
        let mut null_link = new_book("a");
        null_link.file_url = None;
        let mut empty_link = new_book("b");
        empty_link.file_url = Some(String::new());

        gateway.insert(vec![null_link, empty_link]).await.unwrap();

        let inserted = gateway.inserted().await;
        assert_eq!(inserted[0].file_url, None);
        assert_eq!(inserted[1].file_url.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_upload_rejects_existing_name() {
        let gateway = MemoryGateway::new();
        gateway
            .upload("x.pdf", Bytes::from_static(&[1]), "application/pdf")
            .await
            .unwrap();

        let err = gateway
            .upload("x.pdf", Bytes::from_static(&[2]), "application/pdf")
            .await
            .unwrap_err();
        assert_eq!(err.message, "The resource already exists");
        assert_eq!(gateway.object("x.pdf").await.unwrap().1, vec![1]);
    }

    #[tokio::test]
    async fn test_public_url_can_be_withheld() {
        let gateway = MemoryGateway::new();
        assert_eq!(gateway.public_url("x.pdf").as_deref(), Some("http://localhost/storage/v1/object/public/ebooks/x.pdf"));

        gateway.withhold_public_urls().await;
        assert_eq!(gateway.public_url("x.pdf"), None);
    }
}
