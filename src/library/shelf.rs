//! In-memory book collection
//!
//! The shelf is the only owner of the session's records. It is append-only:
//! records are never edited, removed or reordered, so a position in the
//! shelf identifies a book for the lifetime of the process.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayResult};
use crate::util::find_max;

use super::Book;

/// Shared, append-only collection of books
#[derive(Clone, Default)]
pub struct Shelf {
    books: Arc<RwLock<Vec<Book>>>,
}

/// Summary counts over the shelf
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelfStats {
    pub total: usize,
    pub with_file: usize,
    pub imported: usize,
    /// Character count of the longest title, absent on an empty shelf
    pub longest_title: Option<usize>,
}

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable copy of the current collection
    pub async fn snapshot(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    /// Book at `index`, if any
    pub async fn get(&self, index: usize) -> Option<Book> {
        self.books.read().await.get(index).cloned()
    }

    /// Append one book, returning its position
    pub async fn push(&self, book: Book) -> usize {
        let mut books = self.books.write().await;
        books.push(book);
        books.len() - 1
    }

    /// Append several books in order
    pub async fn extend(&self, new_books: Vec<Book>) {
        self.books.write().await.extend(new_books);
    }

    /// Fetch every stored record and append it.
    ///
    /// Records are not de-duplicated: loading twice appends the fetched set
    /// twice.
    pub async fn load_from(&self, gateway: &dyn Gateway) -> GatewayResult<usize> {
        let books = gateway.select_all().await?;
        let count = books.len();
        self.extend(books).await;
        Ok(count)
    }

    pub async fn stats(&self) -> ShelfStats {
        let books = self.books.read().await;
        let title_lengths: Vec<usize> = books.iter().map(|b| b.title.chars().count()).collect();

        ShelfStats {
            total: books.len(),
            with_file: books.iter().filter(|b| b.has_file()).count(),
            imported: books.iter().filter(|b| b.link.is_some()).count(),
            longest_title: find_max(&title_lengths).ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::library::NewBook;

    fn book(title: &str) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            author: "Author".to_string(),
            description: None,
            cover_url: None,
            file_url: format!("https://files.example.com/{}.pdf", title),
            link: None,
            created_at: None,
        }
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            description: None,
            file_url: Some(format!("https://files.example.com/{}.pdf", title)),
            cover_url: None,
        }
    }

    #[tokio::test]
    async fn test_push_returns_position() {
        let shelf = Shelf::new();
        assert_eq!(shelf.push(book("a")).await, 0);
        assert_eq!(shelf.push(book("b")).await, 1);
        assert_eq!(shelf.get(1).await.unwrap().title, "b");
        assert!(shelf.get(2).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let shelf = Shelf::new();
        shelf.push(book("a")).await;

        let before = shelf.snapshot().await;
        shelf.push(book("b")).await;

        assert_eq!(before.len(), 1);
        assert_eq!(shelf.len().await, 2);
    }

    #[tokio::test]
    async fn test_repeated_loads_append_each_time() {
        let gateway = MemoryGateway::with_rows(vec![new_book("a"), new_book("b")]).await;
        let shelf = Shelf::new();

        assert_eq!(shelf.load_from(&gateway).await.unwrap(), 2);
        let once = shelf.snapshot().await;
        assert_eq!(shelf.load_from(&gateway).await.unwrap(), 2);
        let twice = shelf.snapshot().await;

        assert_eq!(twice.len(), 4);
        assert_eq!(&twice[..2], &once[..]);
        assert_eq!(&twice[2..], &once[..]);
    }

    #[tokio::test]
    async fn test_stats() {
        let shelf = Shelf::new();
        assert_eq!(shelf.stats().await.longest_title, None);

        let mut imported = book("feed item");
        imported.file_url = String::new();
        imported.link = Some("ftp://example.com/x".to_string());
        shelf.extend(vec![book("short"), imported]).await;

        let stats = shelf.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_file, 1);
        assert_eq!(stats.imported, 1);
        assert_eq!(stats.longest_title, Some(9));
    }
}
