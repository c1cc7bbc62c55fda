//! Persistence gateway for the hosted backend
//!
//! The hosted backend owns the metadata table and the object storage bucket.
//! This module only wraps its four operations:
//!
//! - select all records
//! - insert one or more records
//! - upload bytes under a name
//! - resolve the public URL of a stored object

mod memory;
mod supabase;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::library::{Book, NewBook};

pub use memory::MemoryGateway;
pub use supabase::SupabaseGateway;

/// Error reported by the hosted backend.
///
/// Only the backend's message is kept; pipelines wrap it into their own
/// user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::new(err.to_string())
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Hosted backend operations
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Every record in the metadata table
    async fn select_all(&self) -> GatewayResult<Vec<Book>>;

    /// Insert records in one call, returning the stored rows with their ids
    async fn insert(&self, books: Vec<NewBook>) -> GatewayResult<Vec<Book>>;

    /// Store raw bytes under `name` in the book bucket
    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> GatewayResult<()>;

    /// Public URL for a stored object, if the backend exposes one
    fn public_url(&self, name: &str) -> Option<String>;
}
