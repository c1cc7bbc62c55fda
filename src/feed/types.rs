//! Feed types

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Cover for feed items that carry no image
pub const DEFAULT_FEED_COVER: &str =
    "https://images.unsplash.com/photo-1589998059171-988d887df646?auto=format&fit=crop&q=80&w=300";

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
/// Link used for items that have none
pub const MISSING_LINK: &str = "#";

/// A feed item, whichever source produced it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub enclosure_url: Option<String>,
    pub image_url: Option<String>,
}

/// Wire format of the RSS-to-JSON proxy
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<ProxyItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// The proxy sends `{}` or `[]` when there is no enclosure
    #[serde(default)]
    pub enclosure: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
}

impl From<ProxyItem> for FeedItem {
    fn from(item: ProxyItem) -> Self {
        FeedItem {
            title: item.title,
            author: item.author,
            description: item.description,
            link: item.link,
            enclosure_url: url_field(item.enclosure.as_ref()),
            image_url: url_field(item.image.as_ref()),
        }
    }
}

fn url_field(value: Option<&serde_json::Value>) -> Option<String> {
    value?.get("url")?.as_str().map(str::to_string)
}

/// Submitted feed form
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// Non-ok status, network failure or unreadable body. The detail is only
    /// logged.
    #[error("Failed to fetch RSS feed")]
    Fetch(String),

    #[error("Database insertion failed: {0}")]
    InsertFailed(String),
}

impl FeedError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    pub fn code(&self) -> &'static str {
        match self {
            FeedError::Fetch(_) => "FEED_FETCH_FAILED",
            FeedError::InsertFailed(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_item_with_empty_enclosure() {
        let response: ProxyResponse = serde_json::from_value(serde_json::json!({
            "status": "ok",
            "feed": { "title": "Example" },
            "items": [
                { "title": "One", "enclosure": {}, "link": "https://example.com/1" },
                { "title": "Two", "enclosure": { "url": "https://example.com/2.jpg" } },
                { "title": "Three", "enclosure": [], "image": { "url": "https://example.com/3.png" } }
            ]
        }))
        .unwrap();

        let items: Vec<FeedItem> = response.items.into_iter().map(FeedItem::from).collect();
        assert_eq!(items[0].enclosure_url, None);
        assert_eq!(items[1].enclosure_url.as_deref(), Some("https://example.com/2.jpg"));
        assert_eq!(items[2].enclosure_url, None);
        assert_eq!(items[2].image_url.as_deref(), Some("https://example.com/3.png"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FeedError::Fetch("status error".into()).to_string(),
            "Failed to fetch RSS feed"
        );
        assert_eq!(
            FeedError::InsertFailed("boom".into()).to_string(),
            "Database insertion failed: boom"
        );
    }
}
