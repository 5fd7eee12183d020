//! Collect articles for every keyword and merge them into one list.
//!
//! Keywords are fetched one after another in list order with a pause in
//! between, so a dashboard with many keywords does not hammer Google News.
//! A keyword that fails is logged, recorded and skipped.

use crate::feeds::FeedSource;
use crate::models::{Article, Collection, KeywordFailure};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Default pause between two keyword requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Fetch every keyword from `source` and merge the results.
///
/// The merged list keeps keyword order and drops any article whose link was
/// already produced by an earlier keyword.
#[instrument(level = "info", skip_all, fields(keywords = keywords.len()))]
pub async fn collect<S>(source: &S, keywords: &[String], delay: Duration) -> Collection
where
    S: FeedSource + ?Sized,
{
    let t0 = Instant::now();
    let total = keywords.len();

    let results: Vec<(String, Result<Vec<Article>, String>)> = stream::iter(keywords.iter().enumerate())
        .then(move |(i, keyword)| async move {
            if i > 0 && !delay.is_zero() {
                sleep(delay).await;
            }
            info!(%keyword, progress = i + 1, total, "Fetching articles for keyword");
            let result = match source.fetch(keyword).await {
                Ok(articles) => {
                    info!(%keyword, count = articles.len(), "Keyword fetched");
                    Ok(articles)
                }
                Err(e) => {
                    error!(%keyword, error = %e, "Keyword fetch failed; skipping");
                    Err(e.to_string())
                }
            };
            (keyword.clone(), result)
        })
        .collect()
        .await;

    let mut fetched = Vec::new();
    let mut failures = Vec::new();
    for (keyword, result) in results {
        match result {
            Ok(articles) => fetched.push(articles),
            Err(error) => failures.push(KeywordFailure { keyword, error }),
        }
    }

    let before = fetched.iter().map(Vec::len).sum::<usize>();
    let articles = dedup_by_link(fetched.into_iter().flatten());
    info!(
        fetched = before,
        unique = articles.len(),
        failed = failures.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Collection complete"
    );

    Collection {
        articles,
        collected_at: Utc::now(),
        keywords_used: keywords.to_vec(),
        failures,
    }
}

/// Keep the first article seen for each link.
pub fn dedup_by_link<I>(articles: I) -> Vec<Article>
where
    I: IntoIterator<Item = Article>,
{
    articles
        .into_iter()
        .unique_by(|a| a.link.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{FeedError, parse_feed};
    use crate::models::tests::article;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Serves canned articles per keyword and remembers the call order.
    #[derive(Default)]
    struct FakeSource {
        feeds: HashMap<String, Vec<Article>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, keyword: &str, links: &[&str]) -> Self {
            let articles = links
                .iter()
                .map(|link| article(keyword, link, "Reuters"))
                .collect();
            self.feeds.insert(keyword.to_string(), articles);
            self
        }
    }

    #[async_trait]
    impl FeedSource for FakeSource {
        async fn fetch(&self, keyword: &str) -> Result<Vec<Article>, FeedError> {
            self.calls.lock().unwrap().push(keyword.to_string());
            self.feeds
                .get(keyword)
                .cloned()
                .ok_or_else(|| FeedError::Status {
                    status: 503,
                    url: format!("https://news.google.com/rss/search?q={keyword}"),
                })
        }
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn links(c: &Collection) -> HashSet<String> {
        c.articles.iter().map(|a| a.link.clone()).collect()
    }

    #[tokio::test]
    async fn test_shared_link_yields_one_entry() {
        let source = FakeSource::default()
            .with("carbon measures", &["https://a.example/shared"])
            .with("scope 3 emissions", &["https://a.example/shared"]);

        let c = collect(
            &source,
            &keywords(&["carbon measures", "scope 3 emissions"]),
            Duration::ZERO,
        )
        .await;

        assert_eq!(c.articles.len(), 1);
        // first keyword wins
        assert_eq!(c.articles[0].keyword, "carbon measures");
    }

    #[tokio::test]
    async fn test_no_duplicate_links() {
        let source = FakeSource::default()
            .with("a", &["https://x/1", "https://x/2", "https://x/1"])
            .with("b", &["https://x/2", "https://x/3"]);

        let c = collect(&source, &keywords(&["a", "b"]), Duration::ZERO).await;
        let unique = links(&c);
        assert_eq!(unique.len(), c.articles.len());
        assert_eq!(c.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_adding_a_keyword_yields_a_superset() {
        let source = FakeSource::default()
            .with("a", &["https://x/1", "https://x/2"])
            .with("b", &["https://x/2", "https://x/3"])
            .with("c", &["https://x/1", "https://x/4"]);

        let smaller = collect(&source, &keywords(&["a", "b"]), Duration::ZERO).await;
        let larger = collect(&source, &keywords(&["a", "b", "c"]), Duration::ZERO).await;
        assert!(links(&smaller).is_subset(&links(&larger)));

        let prefixed = collect(&source, &keywords(&["c", "a", "b"]), Duration::ZERO).await;
        assert!(links(&smaller).is_subset(&links(&prefixed)));
    }

    #[tokio::test]
    async fn test_failed_keyword_is_skipped() {
        let source = FakeSource::default()
            .with("a", &["https://x/1"])
            .with("c", &["https://x/3"]);

        let c = collect(&source, &keywords(&["a", "missing", "c"]), Duration::ZERO).await;

        assert_eq!(c.articles.len(), 2);
        assert_eq!(c.failures.len(), 1);
        assert_eq!(c.failures[0].keyword, "missing");
        assert!(c.failures[0].error.contains("503"));
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["a".to_string(), "missing".to_string(), "c".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_feed_returns_empty_list() {
        let xml = r#"<rss version="2.0"><channel><title>"carbon measures" - Google News</title></channel></rss>"#;
        let mut source = FakeSource::default();
        source.feeds.insert(
            "carbon measures".to_string(),
            parse_feed(xml.as_bytes(), "carbon measures").unwrap(),
        );

        let c = collect(&source, &keywords(&["carbon measures"]), Duration::ZERO).await;
        assert!(c.articles.is_empty());
        assert!(c.failures.is_empty());
        assert_eq!(c.keywords_used, vec!["carbon measures".to_string()]);
    }

    #[tokio::test]
    async fn test_no_keywords() {
        let source = FakeSource::default();
        let c = collect(&source, &[], Duration::ZERO).await;
        assert!(c.articles.is_empty());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_keywords() {
        let source = FakeSource::default()
            .with("a", &["https://x/1"])
            .with("b", &["https://x/2"])
            .with("c", &["https://x/3"]);

        let t0 = tokio::time::Instant::now();
        collect(&source, &keywords(&["a", "b", "c"]), Duration::from_secs(1)).await;
        // two pauses for three keywords
        assert!(t0.elapsed() >= Duration::from_secs(2));
        assert!(t0.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let merged = dedup_by_link(vec![
            article("a", "https://x/1", "First"),
            article("b", "https://x/1", "Second"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "First");
    }
}
