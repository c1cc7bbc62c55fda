//! Configuration management for Library Hub

use std::env;

use serde::Deserialize;

/// Default RSS-to-JSON conversion proxy
pub const DEFAULT_FEED_PROXY: &str = "https://api.rss2json.com/v1/api.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted upload body, in megabytes
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    /// Base URL of the hosted backend (e.g. https://xyz.supabase.co)
    pub url: String,
    /// Public (anon) access key
    pub anon_key: String,
    /// Object storage bucket for book files
    pub bucket: String,
    /// Metadata table for book records
    pub table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Supabase,
    /// In-process gateway, nothing survives a restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub source: FeedSourceKind,
    pub proxy_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSourceKind {
    /// JSON rendering through the conversion proxy
    Proxy,
    /// Fetch and parse the RSS XML ourselves
    Direct,
}

/// Configuration errors are fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_mb: 100,
            },
            gateway: GatewayConfig {
                mode: GatewayMode::Supabase,
                url: String::new(),
                anon_key: String::new(),
                bucket: "ebooks".to_string(),
                table: "ebooks_books".to_string(),
            },
            feed: FeedConfig {
                source: FeedSourceKind::Proxy,
                proxy_url: DEFAULT_FEED_PROXY.to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// The gateway URL and anon key are required unless the gateway runs in
    /// memory mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let mode = match lookup("GATEWAY_MODE").as_deref() {
            None | Some("supabase") => GatewayMode::Supabase,
            Some("memory") => GatewayMode::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "GATEWAY_MODE",
                    value: other.to_string(),
                })
            }
        };

        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => Ok(value),
                None if mode == GatewayMode::Memory => Ok(String::new()),
                None => Err(ConfigError::Missing(key)),
            }
        };

        let source = match lookup("FEED_SOURCE").as_deref() {
            None | Some("proxy") => FeedSourceKind::Proxy,
            Some("direct") => FeedSourceKind::Direct,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "FEED_SOURCE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", lookup("SERVER_PORT"), defaults.server.port)?,
                max_upload_mb: parse_or(
                    "MAX_UPLOAD_MB",
                    lookup("MAX_UPLOAD_MB"),
                    defaults.server.max_upload_mb,
                )?,
            },
            gateway: GatewayConfig {
                mode,
                url: required("SUPABASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                anon_key: required("SUPABASE_ANON_KEY")?,
                bucket: lookup("SUPABASE_BUCKET").unwrap_or(defaults.gateway.bucket),
                table: lookup("SUPABASE_TABLE").unwrap_or(defaults.gateway.table),
            },
            feed: FeedConfig {
                source,
                proxy_url: lookup("FEED_PROXY_URL").unwrap_or(defaults.feed.proxy_url),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
