//! Library Hub Server
//!
//! Serves the e-book shelf, the upload form and the RSS import form.

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_hub::config::Config;
use library_hub::routes;
use library_hub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "library_hub=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting Library Hub v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Gateway: {:?} {}", config.gateway.mode, config.gateway.url);
    tracing::info!("Bucket: {}, table: {}", config.gateway.bucket, config.gateway.table);
    tracing::info!("Feed source: {:?}", config.feed.source);

    let host = config.server.host.clone();
    let port = config.server.port;
    let app_state = AppState::from_config(config);

    // Initial fetch of every stored record
    match app_state.load_library().await {
        Ok(count) => tracing::info!("Library initialized with {} books", count),
        Err(e) => tracing::error!("Error fetching books: {}", e),
    }

    let app = routes::app(app_state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    tracing::info!("Library Hub listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
