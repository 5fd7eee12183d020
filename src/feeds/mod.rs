//! Google News RSS feeds: URL construction, fetching, parsing and caching.
//!
//! Every feed source implements [`FeedSource`], which turns a keyword into
//! the articles found for it. Sources compose the same way the rest of the
//! application expects:
//!
//! | Type | Module | Role |
//! |------|--------|------|
//! | [`GoogleNewsClient`] | [`google_news`] | HTTP fetch + parse of the search feed |
//! | [`CachedFeedSource`] | [`cache`] | Reuses a keyword's articles for a fixed TTL |
//!
//! Failures are returned per keyword; the collector decides to skip and
//! continue.

pub mod cache;
pub mod google_news;
pub mod parser;

use crate::models::Article;
use async_trait::async_trait;
use thiserror::Error;

pub use cache::CachedFeedSource;
pub use google_news::{GoogleNewsClient, Locale};
pub use parser::parse_feed;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse RSS feed: {0}")]
    Parse(String),
}

/// Anything that can produce the articles for one keyword.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>, FeedError>;
}
