//! Grid / single-book view state

use crate::library::Book;

/// What the browse page shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// One card per book
    #[default]
    Grid,
    /// Inline viewer for one book
    Single { index: usize, book: Book },
}

impl ViewState {
    /// Open the book at `index`. Unknown positions leave the state unchanged.
    pub fn select(self, index: usize, books: &[Book]) -> ViewState {
        match books.get(index) {
            Some(book) => ViewState::Single {
                index,
                book: book.clone(),
            },
            None => self,
        }
    }

    /// Back to the grid
    pub fn close(self) -> ViewState {
        ViewState::Grid
    }

    pub fn selected(&self) -> Option<&Book> {
        match self {
            ViewState::Grid => None,
            ViewState::Single { book, .. } => Some(book),
        }
    }
}
