//! RSS feed import
//!
//! Fetches a feed (through the RSS-to-JSON proxy or directly), maps its items
//! onto book records and stores them in one batch.

mod pipeline;
mod source;
mod types;

pub use pipeline::{is_absolute_link, map_item, to_row, FeedImporter};
pub use source::{parse_rss, DirectFeedSource, FeedSource, ProxyFeedSource};
pub use types::*;
