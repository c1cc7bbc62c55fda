//! Book record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cover used whenever no page-one render is available
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/150";

/// A book in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the gateway on insert, absent before
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,

    pub title: String,

    pub author: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Data URL, remote image or placeholder
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Public reference to the stored file. Empty when the backend row has none.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub file_url: String,

    /// Link of the feed item this book was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Title to show, falling back for empty values
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Cover to show, falling back to the placeholder
    pub fn display_cover(&self) -> &str {
        match self.cover_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => PLACEHOLDER_COVER,
        }
    }

    pub fn has_file(&self) -> bool {
        !self.file_url.is_empty()
    }
}

/// Insert payload for the metadata table.
///
/// `file_url` may be null so feed items without an absolute link can still be
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub cover_url: Option<String>,
}

impl NewBook {
    /// Materialize the row the backend would return for this payload
    pub fn into_book(self, id: String) -> Book {
        Book {
            id: Some(id),
            title: self.title,
            author: self.author,
            description: self.description,
            cover_url: self.cover_url,
            file_url: self.file_url.unwrap_or_default(),
            link: None,
            created_at: Some(Utc::now()),
        }
    }
}

/// Tables may use numeric or uuid primary keys
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn deserialize_nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
