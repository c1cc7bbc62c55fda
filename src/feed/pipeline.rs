//! Feed import pipeline
//!
//! fetch -> map -> validate links -> one batch insert.
//!
//! The records handed back to the caller keep the item's original link as
//! `file_url`, while the persisted rows carry `null` for links that are not
//! absolute. The shelf therefore shows links the backend never stored; see
//! DESIGN.md.

use std::sync::Arc;

use crate::gateway::Gateway;
use crate::library::{Book, NewBook};

use super::source::FeedSource;
use super::types::{
    FeedError, FeedItem, DEFAULT_FEED_COVER, MISSING_LINK, UNKNOWN_AUTHOR, UNTITLED,
};

#[derive(Clone)]
pub struct FeedImporter {
    source: Arc<dyn FeedSource>,
    gateway: Arc<dyn Gateway>,
}

impl FeedImporter {
    pub fn new(source: Arc<dyn FeedSource>, gateway: Arc<dyn Gateway>) -> Self {
        Self { source, gateway }
    }

    /// Import every item of the feed at `feed_url`.
    ///
    /// All-or-nothing from the caller's view: a failed batch insert discards
    /// the whole import.
    pub async fn run(&self, feed_url: &str) -> Result<Vec<Book>, FeedError> {
        let items = self.source.fetch(feed_url).await.map_err(|e| {
            if let FeedError::Fetch(detail) = &e {
                tracing::error!(feed_url = %feed_url, "Error fetching RSS feed: {}", detail);
            }
            e
        })?;

        let books: Vec<Book> = items.into_iter().map(map_item).collect();
        let rows: Vec<NewBook> = books.iter().map(to_row).collect();

        let nulled = rows.iter().filter(|r| r.file_url.is_none()).count();
        if nulled > 0 {
            tracing::warn!(
                feed_url = %feed_url,
                count = nulled,
                "Feed items without an absolute link are stored without a file URL"
            );
        }

        self.gateway
            .insert(rows)
            .await
            .map_err(|e| FeedError::InsertFailed(e.message))?;

        tracing::info!(feed_url = %feed_url, count = books.len(), "Imported feed");
        Ok(books)
    }
}

/// Map a feed item onto the book shape, applying the fallbacks
pub fn map_item(item: FeedItem) -> Book {
    let link = non_empty(item.link).unwrap_or_else(|| MISSING_LINK.to_string());
    let cover_url = non_empty(item.enclosure_url)
        .or_else(|| non_empty(item.image_url))
        .unwrap_or_else(|| DEFAULT_FEED_COVER.to_string());

    Book {
        id: None,
        title: non_empty(item.title).unwrap_or_else(|| UNTITLED.to_string()),
        author: non_empty(item.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        description: Some(item.description.unwrap_or_default()),
        cover_url: Some(cover_url),
        file_url: link.clone(),
        link: Some(link),
        created_at: None,
    }
}

/// Row to persist for a mapped book; non-absolute links become null
pub fn to_row(book: &Book) -> NewBook {
    let link = book.link.as_deref().unwrap_or(MISSING_LINK);
    NewBook {
        title: book.title.clone(),
        author: book.author.clone(),
        description: book.description.clone(),
        file_url: is_absolute_link(link).then(|| link.to_string()),
        cover_url: book.cover_url.clone(),
    }
}

pub fn is_absolute_link(link: &str) -> bool {
    link.starts_with("http")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::gateway::MemoryGateway;

    struct StaticSource(Result<Vec<FeedItem>, FeedError>);

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn fetch(&self, _feed_url: &str) -> Result<Vec<FeedItem>, FeedError> {
            self.0.clone()
        }
    }

    fn importer(
        items: Result<Vec<FeedItem>, FeedError>,
    ) -> (Arc<MemoryGateway>, FeedImporter) {
        let gateway = Arc::new(MemoryGateway::new());
        let importer = FeedImporter::new(Arc::new(StaticSource(items)), gateway.clone());
        (gateway, importer)
    }

    fn item(title: &str, link: &str) -> FeedItem {
        FeedItem {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_map_item_fallbacks() {
        let book = map_item(FeedItem::default());

        assert_eq!(book.title, UNTITLED);
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert_eq!(book.description.as_deref(), Some(""));
        assert_eq!(book.cover_url.as_deref(), Some(DEFAULT_FEED_COVER));
        assert_eq!(book.link.as_deref(), Some(MISSING_LINK));
        assert_eq!(book.id, None);
    }

    #[test]
    fn test_cover_fallback_chain() {
        let both = FeedItem {
            enclosure_url: Some("https://e.example.com/a.jpg".into()),
            image_url: Some("https://i.example.com/a.jpg".into()),
            ..Default::default()
        };
        assert_eq!(
            map_item(both).cover_url.as_deref(),
            Some("https://e.example.com/a.jpg")
        );

        let image_only = FeedItem {
            enclosure_url: Some(String::new()),
            image_url: Some("https://i.example.com/a.jpg".into()),
            ..Default::default()
        };
        assert_eq!(
            map_item(image_only).cover_url.as_deref(),
            Some("https://i.example.com/a.jpg")
        );
    }

    #[test]
    fn test_link_validation() {
        assert!(is_absolute_link("https://example.com/a.pdf"));
        assert!(is_absolute_link("http://example.com/a.pdf"));
        assert!(!is_absolute_link("ftp://example.com/x"));
        assert!(!is_absolute_link("#"));
        assert!(!is_absolute_link("/relative/path"));
    }

    #[tokio::test]
    async fn test_non_absolute_link_persisted_as_null() {
        let (gateway, importer) = importer(Ok(vec![item("Remote", "ftp://example.com/x")]));

        let books = importer.run("https://feeds.example.com/rss").await.unwrap();

        let inserted = gateway.inserted().await;
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].file_url, None);

        assert_eq!(books[0].link.as_deref(), Some("ftp://example.com/x"));
        assert_eq!(books[0].file_url, "ftp://example.com/x");
    }

    #[tokio::test]
    async fn test_absolute_links_persisted() {
        let (gateway, importer) = importer(Ok(vec![
            item("A", "https://example.com/a.pdf"),
            item("B", "http://example.com/b.pdf"),
        ]));

        let books = importer.run("https://feeds.example.com/rss").await.unwrap();

        assert_eq!(books.len(), 2);
        let inserted = gateway.inserted().await;
        assert_eq!(inserted[0].file_url.as_deref(), Some("https://example.com/a.pdf"));
        assert_eq!(inserted[1].file_url.as_deref(), Some("http://example.com/b.pdf"));
        assert_eq!(gateway.rows().await[0].title, "A");
    }

    #[tokio::test]
    async fn test_empty_feed_is_a_successful_noop() {
        let (gateway, importer) = importer(Ok(vec![]));

        let books = importer.run("https://feeds.example.com/empty").await.unwrap();

        assert!(books.is_empty());
        assert!(gateway.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_inserts_nothing() {
        let (gateway, importer) = importer(Err(FeedError::Fetch("status error".into())));

        let err = importer.run("https://feeds.example.com/rss").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch RSS feed");
        assert!(gateway.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_rejects_whole_batch() {
        let (gateway, importer) = importer(Ok(vec![
            item("A", "https://example.com/a.pdf"),
            item("B", "https://example.com/b.pdf"),
        ]));
        gateway.fail_inserts("value too long for type character varying").await;

        let err = importer.run("https://feeds.example.com/rss").await.unwrap_err();

        assert_eq!(
            err,
            FeedError::InsertFailed("value too long for type character varying".into())
        );
        assert!(gateway.rows().await.is_empty());
    }
}
