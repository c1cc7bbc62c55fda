//! Feed sources
//!
//! A feed source turns a feed URL into a list of items. The proxy source asks
//! the RSS-to-JSON conversion service; the direct source downloads the RSS
//! document and parses it with quick-xml.

use async_trait::async_trait;
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;

use super::types::{FeedError, FeedItem, ProxyResponse};

/// Feed fetching backend
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedItem>, FeedError>;
}

/// RSS-to-JSON conversion proxy
pub struct ProxyFeedSource {
    client: Client,
    proxy_url: String,
}

impl ProxyFeedSource {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.into(),
        }
    }

    fn request_url(&self, feed_url: &str) -> String {
        format!("{}?rss_url={}", self.proxy_url, urlencoding::encode(feed_url))
    }
}

#[async_trait]
impl FeedSource for ProxyFeedSource {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedItem>, FeedError> {
        let response = self
            .client
            .get(self.request_url(feed_url))
            .send()
            .await
            .map_err(|e| FeedError::Fetch(format!("Proxy request failed: {}", e)))?;

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Fetch(format!("Failed to parse proxy response: {}", e)))?;

        if body.status != "ok" {
            return Err(FeedError::Fetch(format!(
                "Proxy returned status {}: {}",
                body.status,
                body.message.unwrap_or_default()
            )));
        }

        Ok(body.items.into_iter().map(FeedItem::from).collect())
    }
}

/// Downloads and parses RSS 2.0 documents without the proxy
pub struct DirectFeedSource {
    client: Client,
}

impl DirectFeedSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for DirectFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for DirectFeedSource {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedItem>, FeedError> {
        let response = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(|e| FeedError::Fetch(format!("Feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FeedError::Fetch(format!(
                "Feed returned {}",
                response.status()
            )));
        }

        let xml = response
            .text()
            .await
            .map_err(|e| FeedError::Fetch(format!("Failed to read feed: {}", e)))?;

        parse_rss(&xml)
    }
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    author: Option<String>,
    #[serde(rename = "dc:creator", alias = "creator")]
    creator: Option<String>,
    enclosure: Option<RssEnclosure>,
    image: Option<RssImage>,
}

#[derive(Debug, Deserialize)]
struct RssEnclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RssImage {
    url: Option<String>,
}

/// Parse an RSS 2.0 document into feed items
pub fn parse_rss(xml: &str) -> Result<Vec<FeedItem>, FeedError> {
    let doc: RssDocument =
        from_str(xml).map_err(|e| FeedError::Fetch(format!("Failed to parse RSS: {}", e)))?;

    Ok(doc
        .channel
        .items
        .into_iter()
        .map(|item| FeedItem {
            title: item.title,
            author: item.author.or(item.creator),
            description: item.description,
            link: item.link,
            enclosure_url: item.enclosure.and_then(|e| e.url),
            image_url: item.image.and_then(|i| i.url),
        })
        .collect())
}
