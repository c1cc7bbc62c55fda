//! HTML view routes
//!
//! - GET  /              book grid
//! - GET  /books/:index  single-book viewer
//! - GET  /rss, POST /rss       feed import form
//! - GET  /upload, POST /upload upload form

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Form, Router,
};

use crate::feed::FeedRequest;
use crate::html::{browse_page, feed_page, upload_page, FeedForm, UploadForm, ViewState};
use crate::state::AppState;

use super::upload::read_upload_form;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse))
        .route("/books/:index", get(view_book))
        .route("/rss", get(feed_form).post(submit_feed))
        .route("/upload", get(upload_form).post(submit_upload))
}

async fn browse(State(state): State<AppState>) -> Html<String> {
    let books = state.shelf().snapshot().await;
    Html(browse_page(&ViewState::Grid, &books))
}

async fn view_book(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> (StatusCode, Html<String>) {
    let books = state.shelf().snapshot().await;
    let view = ViewState::Grid.select(index, &books);

    let status = match view {
        ViewState::Grid => {
            tracing::debug!(index, total = books.len(), "Book not on shelf");
            StatusCode::NOT_FOUND
        }
        ViewState::Single { .. } => StatusCode::OK,
    };

    (status, Html(browse_page(&view, &books)))
}

async fn feed_form() -> Html<String> {
    Html(feed_page(&FeedForm::default()))
}

async fn submit_feed(
    State(state): State<AppState>,
    Form(request): Form<FeedRequest>,
) -> (StatusCode, Html<String>) {
    match state.feeds().run(&request.url).await {
        Ok(books) => {
            let count = books.len();
            state.shelf().extend(books).await;
            (
                StatusCode::OK,
                Html(feed_page(&FeedForm {
                    url: String::new(),
                    error: None,
                    imported: Some(count),
                })),
            )
        }
        Err(e) => {
            tracing::error!(feed_url = %request.url, "Error fetching RSS feed: {}", e);
            (
                e.status_code(),
                Html(feed_page(&FeedForm {
                    url: request.url,
                    error: Some(e.to_string()),
                    imported: None,
                })),
            )
        }
    }
}

async fn upload_form() -> Html<String> {
    Html(upload_page(&UploadForm::default()))
}

async fn submit_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let request = match read_upload_form(multipart).await {
        Ok(request) => request,
        Err(e) => {
            let (status, _, message) = e.parts();
            return (
                status,
                Html(upload_page(&UploadForm {
                    error: Some(message),
                    ..Default::default()
                })),
            );
        }
    };
    let name = request.author.clone();

    match state.uploads().run(request).await {
        Ok(outcome) => {
            state.shelf().push(outcome.book).await;
            (
                StatusCode::OK,
                Html(upload_page(&UploadForm {
                    name,
                    error: None,
                    file_url: Some(outcome.file_url),
                })),
            )
        }
        Err(e) => {
            tracing::error!("Error uploading book: {}", e);
            (
                e.status_code(),
                Html(upload_page(&UploadForm {
                    name,
                    error: Some(e.to_string()),
                    file_url: None,
                })),
            )
        }
    }
}
