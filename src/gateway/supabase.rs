//! Supabase REST client
//!
//! Talks to the PostgREST table endpoint and the storage API with the
//! project's anon key.

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::config::GatewayConfig;
use crate::library::{Book, NewBook};

use super::{Gateway, GatewayError, GatewayResult};

/// Hosted backend client
#[derive(Clone)]
pub struct SupabaseGateway {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
    table: String,
}

/// Error body shapes returned by PostgREST and the storage API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

impl SupabaseGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
            table: config.table.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(name)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.anon_key))
    }

    /// Turn a non-success response into the backend's message
    async fn check(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error).or(b.msg))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });

        Err(GatewayError::new(message))
    }
}

#[async_trait]
impl Gateway for SupabaseGateway {
    async fn select_all(&self) -> GatewayResult<Vec<Book>> {
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("select", "*")])
            .send()
            .await?;

        let books = Self::check(response).await?.json::<Vec<Book>>().await?;
        tracing::debug!(count = books.len(), table = %self.table, "Selected records");
        Ok(books)
    }

    async fn insert(&self, books: Vec<NewBook>) -> GatewayResult<Vec<Book>> {
        let count = books.len();
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&books)
            .send()
            .await?;

        let stored = Self::check(response).await?.json::<Vec<Book>>().await?;
        tracing::debug!(sent = count, stored = stored.len(), table = %self.table, "Inserted records");
        Ok(stored)
    }

    async fn upload(&self, name: &str, data: Bytes, content_type: &str) -> GatewayResult<()> {
        let size = data.len();
        let response = self
            .authorized(self.client.post(self.object_url(name)))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::debug!(name = %name, size, bucket = %self.bucket, "Stored object");
        Ok(())
    }

    fn public_url(&self, name: &str) -> Option<String> {
        if self.base_url.is_empty() || name.is_empty() {
            return None;
        }
        Some(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(name)
        ))
    }
}
