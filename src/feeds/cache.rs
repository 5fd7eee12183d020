//! Time-based caching decorator for feed sources.
//!
//! [`CachedFeedSource`] wraps any [`FeedSource`] and remembers the articles
//! returned for each keyword. A cached entry is served until its age reaches
//! the TTL, after which the next request goes back to the inner source.
//!
//! Expired entries for every keyword are dropped whenever a fresh result is
//! stored, so keywords that were removed do not linger in memory.
//!
//! Only successful fetches are stored. A keyword that failed is retried on
//! the next collection instead of being pinned to an empty result for an hour.

use crate::models::Article;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{FeedError, FeedSource};

/// Default lifetime of a cached keyword result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    fetched_at: Instant,
    articles: Vec<Article>,
}

pub struct CachedFeedSource<S> {
    /// The source that is consulted on a miss.
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<S> CachedFeedSource<S>
where
    S: FeedSource,
{
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<S> fmt::Debug for CachedFeedSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedFeedSource")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[async_trait]
impl<S> FeedSource for CachedFeedSource<S>
where
    S: FeedSource,
{
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, keyword: &str) -> Result<Vec<Article>, FeedError> {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(keyword) {
                let age = entry.fetched_at.elapsed();
                if age < self.ttl {
                    debug!(age_secs = age.as_secs(), "Feed cache hit");
                    return Ok(entry.articles.clone());
                }
            }
        }

        // Lock released while the network call runs
        let articles = self.inner.fetch(keyword).await?;

        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        let evicted = before - entries.len();
        entries.insert(
            keyword.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                articles: articles.clone(),
            },
        );
        debug!(count = articles.len(), evicted, "Feed cache stored");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::article;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails for keywords starting with `fail`.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn fetch(&self, keyword: &str) -> Result<Vec<Article>, FeedError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if keyword.starts_with("fail") {
                return Err(FeedError::Parse("boom".to_string()));
            }
            Ok(vec![article(
                keyword,
                &format!("https://a.example/{keyword}/{n}"),
                "Reuters",
            )])
        }
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let cached = CachedFeedSource::new(CountingSource::default(), DEFAULT_TTL);
        let first = cached.fetch("net zero").await.unwrap();
        let second = cached.fetch("net zero").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_keywords_are_cached_independently() {
        let cached = CachedFeedSource::new(CountingSource::default(), DEFAULT_TTL);
        cached.fetch("a").await.unwrap();
        cached.fetch("b").await.unwrap();
        cached.fetch("a").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.entries.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_storing_evicts_expired_entries_of_other_keywords() {
        let cached = CachedFeedSource::new(CountingSource::default(), Duration::ZERO);
        cached.fetch("old keyword").await.unwrap();
        cached.fetch("new keyword").await.unwrap();

        let entries = cached.entries.lock().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("new keyword"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_refetched() {
        let cached = CachedFeedSource::new(CountingSource::default(), Duration::ZERO);
        let first = cached.fetch("net zero").await.unwrap();
        let second = cached.fetch("net zero").await.unwrap();

        assert_ne!(first[0].link, second[0].link);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cached = CachedFeedSource::new(CountingSource::default(), DEFAULT_TTL);
        assert!(cached.fetch("fail once").await.is_err());
        assert!(cached.fetch("fail once").await.is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.entries.lock().await.len(), 0);
    }
}
