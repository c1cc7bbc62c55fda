//! Route modules for Library Hub

pub mod books;
pub mod feeds;
pub mod health;
pub mod pages;
pub mod upload;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let body_limit = state.config().server.max_upload_mb * 1024 * 1024;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(pages::router())
        .nest("/health", health::router())
        .nest("/api/v1/health", health::router())
        .nest("/api/v1/books", books::router())
        .nest("/api/v1/stats", books::stats_router())
        .nest("/api/v1/feeds", feeds::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
