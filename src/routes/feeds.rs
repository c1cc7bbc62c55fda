//! Feed import API
//!
//! POST /api/v1/feeds with `{"url": "..."}`

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::feed::FeedRequest;
use crate::library::Book;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub books: Vec<Book>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(import_feed))
}

async fn import_feed(
    State(state): State<AppState>,
    Json(request): Json<FeedRequest>,
) -> Result<Json<ImportResponse>> {
    let books = state.feeds().run(&request.url).await?;

    state.shelf().extend(books.clone()).await;
    Ok(Json(ImportResponse {
        imported: books.len(),
        books,
    }))
}
