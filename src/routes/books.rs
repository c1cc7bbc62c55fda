//! Book API endpoints
//!
//! - GET  /api/v1/books        list the shelf
//! - POST /api/v1/books        upload a book (multipart: name, file)
//! - GET  /api/v1/books/:index one book by shelf position
//! - GET  /api/v1/stats        shelf summary

use axum::{
    extract::{Multipart, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::library::{Book, ShelfStats};
use crate::state::AppState;
use crate::upload::UploadOutcome;

use super::upload::read_upload_form;

/// Response for book list
#[derive(Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub total: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(upload_book))
        .route("/:index", get(get_book))
}

pub fn stats_router() -> Router<AppState> {
    Router::new().route("/", get(stats))
}

async fn list_books(State(state): State<AppState>) -> Json<BookListResponse> {
    let books = state.shelf().snapshot().await;
    let total = books.len();
    Json(BookListResponse { books, total })
}

async fn get_book(State(state): State<AppState>, Path(index): Path<usize>) -> Result<Json<Book>> {
    state
        .shelf()
        .get(index)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No book at position {}", index)))
}

async fn upload_book(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadOutcome>> {
    let request = read_upload_form(multipart).await?;

    let outcome = state.uploads().run(request).await.map_err(|e| {
        tracing::error!("Error uploading book: {}", e);
        e
    })?;

    state.shelf().push(outcome.book.clone()).await;
    Ok(Json(outcome))
}

async fn stats(State(state): State<AppState>) -> Json<ShelfStats> {
    Json(state.shelf().stats().await)
}
