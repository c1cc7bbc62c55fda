//! Application state management

use std::sync::Arc;

use crate::config::{Config, FeedSourceKind, GatewayMode};
use crate::feed::{DirectFeedSource, FeedImporter, FeedSource, ProxyFeedSource};
use crate::gateway::{Gateway, MemoryGateway, SupabaseGateway};
use crate::library::Shelf;
use crate::upload::UploadPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    gateway: Arc<dyn Gateway>,
    shelf: Shelf,
    uploads: UploadPipeline,
    feeds: FeedImporter,
}

impl AppState {
    /// Create a new application state around the given collaborators
    pub fn new(config: Config, gateway: Arc<dyn Gateway>, feed_source: Arc<dyn FeedSource>) -> Self {
        let uploads = UploadPipeline::new(gateway.clone());
        let feeds = FeedImporter::new(feed_source, gateway.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                shelf: Shelf::new(),
                uploads,
                feeds,
            }),
        }
    }

    /// Build the gateway and feed source selected by the configuration
    pub fn from_config(config: Config) -> Self {
        let gateway: Arc<dyn Gateway> = match config.gateway.mode {
            GatewayMode::Supabase => Arc::new(SupabaseGateway::new(&config.gateway)),
            GatewayMode::Memory => {
                tracing::warn!("Using in-memory gateway; records are lost on restart");
                Arc::new(MemoryGateway::new())
            }
        };

        let feed_source: Arc<dyn FeedSource> = match config.feed.source {
            FeedSourceKind::Proxy => Arc::new(ProxyFeedSource::new(config.feed.proxy_url.clone())),
            FeedSourceKind::Direct => Arc::new(DirectFeedSource::new()),
        };

        Self::new(config, gateway, feed_source)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the persistence gateway
    pub fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    /// Get the book shelf
    pub fn shelf(&self) -> &Shelf {
        &self.inner.shelf
    }

    pub fn uploads(&self) -> &UploadPipeline {
        &self.inner.uploads
    }

    pub fn feeds(&self) -> &FeedImporter {
        &self.inner.feeds
    }

    /// Append every stored record to the shelf
    pub async fn load_library(&self) -> crate::gateway::GatewayResult<usize> {
        self.shelf().load_from(self.gateway()).await
    }
}
